//! Output formatting utilities

use colored::Colorize;

/// Format a warning line
pub(crate) fn warning(msg: &str) -> String {
    format!("{} {}", "[WARN]".yellow().bold(), msg)
}

/// Format an error line
pub(crate) fn error(msg: &str) -> String {
    format!("{} {}", "[ERROR]".red().bold(), msg)
}

/// Format an info line
pub(crate) fn info(msg: &str) -> String {
    format!("{} {}", "[INFO]".blue(), msg)
}

/// Format a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", key.white().bold(), value)
}
