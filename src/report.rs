//! Terminal rendering of the dashboard panels.
//!
//! Every function returns the panel as a `String`; callers decide where it
//! goes. Colour follows the `colored` global override, so `--no-color`
//! output is plain text.

use crate::bench::BenchResults;
use crate::data::DataFrame;
use crate::error::{BeneishError, Result};
use crate::explain::FeatureImportance;
use crate::interpret::BeeswarmRow;
use crate::metrics::{Metric, MetricRecord};
use crate::tuning::TuningReport;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

const NAME_WIDTH: usize = 14;
const CELL_WIDTH: usize = 10;
const BAR_CHARS: &str = "█";
const DENSITY: [char; 4] = ['·', '∘', '•', '●'];

/// Low-value end of the beeswarm colour scale.
const BLUE: (u8, u8, u8) = (30, 136, 229);
/// High-value end of the beeswarm colour scale.
const RED: (u8, u8, u8) = (255, 13, 87);

/// Section header.
#[must_use]
pub fn section(title: &str) -> String {
    format!("\n{}\n", format!("=== {title} ===").cyan().bold())
}

/// First rows of the uploaded table, every column.
#[must_use]
pub fn preview_table(frame: &DataFrame, n_rows: usize) -> String {
    let names = frame.column_names();
    let rows = frame.head(n_rows);
    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            rows.iter()
                .map(|r| r[j].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = names
        .iter()
        .zip(&widths)
        .map(|(name, &w)| format!("{name:>w$}"))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").bold());
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:>w$}"))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  "));
    }
    let (total_rows, total_cols) = frame.shape();
    let _ = writeln!(out, "{} rows × {} columns", total_rows, total_cols);
    out
}

fn table_header() -> String {
    let mut line = format!("{:<NAME_WIDTH$}", "Model");
    for metric in Metric::ALL {
        let _ = write!(line, "{:>CELL_WIDTH$}", metric.label());
    }
    line.bold().to_string()
}

fn table_row(record: &MetricRecord, is_max: impl Fn(Metric) -> bool) -> String {
    let mut line = format!("{:<NAME_WIDTH$}", record.model);
    for metric in Metric::ALL {
        let cell = format!("{:>width$.4}", record.get(metric), width = CELL_WIDTH - 1);
        if is_max(metric) {
            let _ = write!(line, "{}", format!("{cell}*").green().bold());
        } else {
            let _ = write!(line, "{cell} ");
        }
    }
    line
}

/// Bench comparison table; `*` marks each column's maximum.
#[must_use]
pub fn bench_table(results: &BenchResults) -> String {
    let mut out = table_header();
    out.push('\n');
    for (i, record) in results.records.iter().enumerate() {
        out.push_str(&table_row(record, |m| results.is_max(i, m)));
        out.push('\n');
    }
    out
}

/// Single-row table for the tuned model.
#[must_use]
pub fn record_table(record: &MetricRecord) -> String {
    format!("{}\n{}\n", table_header(), table_row(record, |_| false))
}

/// Horizontal bar per model, scaled to `width` cells at accuracy 1.
#[must_use]
pub fn accuracy_chart(results: &BenchResults, width: usize) -> String {
    let mut out = String::new();
    for record in &results.records {
        let cells = bar_cells(record.accuracy, 1.0, width);
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$}{} {:.4}",
            record.model,
            BAR_CHARS.repeat(cells).blue(),
            record.accuracy
        );
    }
    out
}

fn bar_cells(value: f32, max: f32, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / max).clamp(0.0, 1.0) * width as f32).round() as usize
}

/// One-line note naming the most accurate benched model.
#[must_use]
pub fn best_model_note(results: &BenchResults) -> String {
    match results.best_by_accuracy() {
        Some(best) => format!(
            "Best model by accuracy: {} ({:.4})",
            best.model.green().bold(),
            best.accuracy
        ),
        None => "No models trained".to_string(),
    }
}

/// Grid scores, winning combination and the refit model's metrics.
#[must_use]
pub fn tuning_panel(report: &TuningReport) -> String {
    let mut out = format!(
        "{}\n",
        format!("Grid search: {}-fold CV, ROC AUC", report.cv_folds).bold()
    );
    for combo in &report.combos {
        let line = format!(
            "  {:<48} {:.4} ± {:.4}",
            combo.params.to_string(),
            combo.mean_score,
            combo.std_score
        );
        if combo.params == report.best_params {
            let _ = writeln!(out, "{}", line.green());
        } else {
            let _ = writeln!(out, "{line}");
        }
    }
    let _ = writeln!(
        out,
        "Best parameters: {}",
        report.best_params.to_string().green().bold()
    );
    let _ = writeln!(out, "Best CV ROC AUC: {:.4}", report.best_score);
    out.push_str(&record_table(&report.record));
    out
}

/// Ranked bars of mean |attribution|.
#[must_use]
pub fn importance_chart(importance: &[FeatureImportance], width: usize) -> String {
    let max = importance.first().map_or(0.0, |f| f.mean_abs_shap);
    let mut out = String::new();
    for item in importance {
        let _ = writeln!(
            out,
            "{:<6}{} {:.4}",
            item.feature,
            BAR_CHARS.repeat(bar_cells(item.mean_abs_shap, max, width)).red(),
            item.mean_abs_shap
        );
    }
    out
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

/// Density strip per feature over its attribution range, coloured by mean
/// feature value (blue low, red high).
#[must_use]
pub fn beeswarm_chart(feature_names: &[String], rows: &[BeeswarmRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let name = feature_names
            .get(row.feature)
            .map_or("?", String::as_str);
        let peak = row.bins.iter().map(|b| b.count).max().unwrap_or_default();
        let mut strip = String::new();
        for bin in &row.bins {
            match bin.color {
                Some(t) if bin.count > 0 => {
                    let level = (bin.count * DENSITY.len()).div_ceil(peak.max(1)) - 1;
                    let glyph = DENSITY[level.min(DENSITY.len() - 1)].to_string();
                    let _ = write!(
                        strip,
                        "{}",
                        glyph.truecolor(
                            lerp(BLUE.0, RED.0, t),
                            lerp(BLUE.1, RED.1, t),
                            lerp(BLUE.2, RED.2, t)
                        )
                    );
                }
                _ => strip.push(' '),
            }
        }
        let _ = writeln!(out, "{name:<6}{:>8.3} |{strip}| {:.3}", row.min, row.max);
    }
    let _ = writeln!(
        out,
        "feature value: {} low  {} high",
        "●".truecolor(BLUE.0, BLUE.1, BLUE.2),
        "●".truecolor(RED.0, RED.1, RED.2)
    );
    out
}

/// Pretty JSON for `--json` output.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| BeneishError::Other(format!("JSON serialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::BeeswarmBin;

    fn record(model: &str, accuracy: f32) -> MetricRecord {
        MetricRecord {
            model: model.to_string(),
            accuracy,
            precision: 0.5,
            recall: 0.25,
            f1: 1.0 / 3.0,
            roc_auc: 0.75,
        }
    }

    fn results() -> BenchResults {
        BenchResults {
            records: vec![record("SVM", 0.8), record("XGBoost", 0.95)],
        }
    }

    #[test]
    fn test_bench_table_marks_maxima() {
        colored::control::set_override(false);
        let table = bench_table(&results());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ROC-AUC"));
        assert!(lines[1].starts_with("SVM"));
        assert!(lines[1].contains("0.8000 "));
        assert!(lines[2].contains("0.9500*"));
        // Tied columns are marked on every row.
        assert!(lines[1].contains("0.7500*"));
        assert!(lines[2].contains("0.7500*"));
    }

    #[test]
    fn test_accuracy_chart_bar_lengths() {
        colored::control::set_override(false);
        let chart = accuracy_chart(&results(), 20);
        let bars: Vec<usize> = chart
            .lines()
            .map(|l| l.chars().filter(|&c| c == '█').count())
            .collect();
        assert_eq!(bars, vec![16, 19]);
    }

    #[test]
    fn test_best_model_note() {
        colored::control::set_override(false);
        assert_eq!(best_model_note(&results()), "Best model by accuracy: XGBoost (0.9500)");
        assert_eq!(
            best_model_note(&BenchResults { records: vec![] }),
            "No models trained"
        );
    }

    #[test]
    fn test_bar_cells_bounds() {
        assert_eq!(bar_cells(0.5, 1.0, 10), 5);
        assert_eq!(bar_cells(2.0, 1.0, 10), 10);
        assert_eq!(bar_cells(0.3, 0.0, 10), 0);
        assert_eq!(bar_cells(f32::NAN, 1.0, 10), 0);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(30, 255, 0.0), 30);
        assert_eq!(lerp(30, 255, 1.0), 255);
        assert_eq!(lerp(0, 100, 0.5), 50);
    }

    #[test]
    fn test_preview_table_shape_line() {
        colored::control::set_override(false);
        let frame = DataFrame::from_csv_reader("a,b\n1,x\n2,y\n3,z\n".as_bytes(), "inline")
            .expect("csv");
        let table = preview_table(&frame, 2);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with('y'));
        assert_eq!(lines[3], "3 rows × 2 columns");
    }

    #[test]
    fn test_beeswarm_chart_density() {
        colored::control::set_override(false);
        let rows = vec![BeeswarmRow {
            feature: 0,
            min: -1.0,
            max: 1.0,
            bins: vec![
                BeeswarmBin { count: 4, color: Some(0.0) },
                BeeswarmBin { count: 0, color: None },
                BeeswarmBin { count: 1, color: Some(1.0) },
            ],
        }];
        let chart = beeswarm_chart(&["DSRI".to_string()], &rows);
        let first = chart.lines().next().expect("row");
        assert!(first.starts_with("DSRI"));
        assert!(first.contains("|● ·|"));
    }

    #[test]
    fn test_importance_chart_scales_to_first() {
        colored::control::set_override(false);
        let importance = vec![
            FeatureImportance { feature: "DSRI".to_string(), mean_abs_shap: 0.8 },
            FeatureImportance { feature: "LEVI".to_string(), mean_abs_shap: 0.2 },
        ];
        let chart = importance_chart(&importance, 8);
        let bars: Vec<usize> = chart
            .lines()
            .map(|l| l.chars().filter(|&c| c == '█').count())
            .collect();
        assert_eq!(bars, vec![8, 2]);
        assert!(chart.starts_with("DSRI"));
    }

    #[test]
    fn test_json_output() {
        let json = to_json(&record("KNN", 1.0)).expect("json");
        assert!(json.contains("\"f1_score\""));
        assert!(json.contains("\"model\": \"KNN\""));
    }
}
