//! Sequential ensembles of weak learners.

mod adaboost;

pub use adaboost::AdaBoostClassifier;

#[cfg(test)]
mod tests_adaboost_contract;
