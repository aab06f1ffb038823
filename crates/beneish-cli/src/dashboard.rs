//! Interactive dashboard: one command per line against a [`Session`].

use crate::error::{CliError, Result};
use crate::output;
use beneish::config::{DashboardConfig, Variant};
use beneish::explain::FeatureImportance;
use beneish::report;
use beneish::session::Session;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

const BAR_WIDTH: usize = 40;

pub(crate) const HELP: &str = "\
Commands:
  load <path>        read an .xlsx workbook or CSV file and split it
  preview            show the first rows of the loaded file
  test-size <f>      change the test fraction (0.1 to 0.5) and re-split
  train              train and compare every model
  tune               grid-search XGBoost and keep the best model
  explain [on|off]   show SHAP charts for the tuned model, or toggle them
  status             show what the session holds
  help               show this message
  quit               leave the dashboard";

/// One dashboard action.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Load(PathBuf),
    Preview,
    TestSize(f64),
    Train,
    Tune,
    Explain(Option<bool>),
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();
        let command = match (name.as_str(), arg) {
            ("load", Some(path)) => Command::Load(PathBuf::from(path)),
            ("load", None) => return Err(CliError::Usage("usage: load <path>".to_string())),
            ("preview", None) => Command::Preview,
            ("test-size", Some(raw)) => Command::TestSize(raw.parse().map_err(|_| {
                CliError::Usage(format!("test-size expects a number, got '{raw}'"))
            })?),
            ("test-size", None) => {
                return Err(CliError::Usage("usage: test-size <fraction>".to_string()))
            }
            ("train", None) => Command::Train,
            ("tune", None) => Command::Tune,
            ("explain", None) => Command::Explain(None),
            ("explain", Some("on")) => Command::Explain(Some(true)),
            ("explain", Some("off")) => Command::Explain(Some(false)),
            ("status", None) => Command::Status,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            _ => {
                return Err(CliError::Usage(format!(
                    "unknown command '{}'; type 'help'",
                    line.trim()
                )))
            }
        };
        if parts.next().is_some() {
            return Err(CliError::Usage(format!("too many arguments in '{}'", line.trim())));
        }
        Ok(command)
    }
}

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

#[derive(Serialize)]
struct StatusView<'a> {
    source: Option<&'a str>,
    rows: Option<usize>,
    test_size: f64,
    seed: u64,
    variant: Variant,
    trained: bool,
    tuned: bool,
    explanation_shown: bool,
}

#[derive(Serialize)]
struct ExplanationView<'a> {
    expected_value: f32,
    importance: &'a [FeatureImportance],
}

/// Session plus the presentation state of the dashboard.
pub(crate) struct Dashboard<W: Write> {
    session: Session,
    show_explanation: bool,
    json: bool,
    out: W,
}

impl<W: Write> Dashboard<W> {
    pub(crate) fn new(config: DashboardConfig, json: bool, out: W) -> Self {
        Self {
            session: Session::new(config),
            show_explanation: false,
            json,
            out,
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.out
    }

    fn variant(&self) -> Variant {
        self.session.config().variant
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn emit_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let json = report::to_json(value)?;
        self.emit(&json)
    }

    /// Runs one command.
    pub(crate) fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Load(path) => self.load(path)?,
            Command::Preview => self.preview()?,
            Command::TestSize(fraction) => {
                self.session.set_test_size(fraction)?;
                let msg = format!("test size set to {fraction}; train and tune again");
                self.emit(&output::info(&msg))?;
            }
            Command::Train => self.train()?,
            Command::Tune => self.tune()?,
            Command::Explain(toggle) => {
                if let Some(on) = toggle {
                    self.show_explanation = on;
                }
                if self.show_explanation || toggle.is_none() {
                    self.explain()?;
                }
            }
            Command::Status => self.status()?,
            Command::Help => self.emit(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self, path: PathBuf) -> Result<()> {
        self.session.load(&path)?;
        if !self.json {
            let msg = format!("loaded {}", path.display());
            self.emit(&output::info(&msg))?;
        }
        self.preview()
    }

    fn preview(&mut self) -> Result<()> {
        let rows = self.session.config().preview_rows;
        let frame = self
            .session
            .frame()
            .ok_or_else(|| CliError::Usage("no dataset loaded; use 'load <path>'".to_string()))?;
        if self.json {
            let head = frame.head(rows);
            let names = frame.column_names();
            let records: Vec<serde_json::Map<String, serde_json::Value>> = head
                .into_iter()
                .map(|row| {
                    names
                        .iter()
                        .zip(row)
                        .map(|(name, cell)| ((*name).to_string(), serde_json::Value::String(cell)))
                        .collect()
                })
                .collect();
            return self.emit_json(&records);
        }
        let text = format!("{}{}", report::section("Data preview"), report::preview_table(frame, rows));
        self.emit(&text)
    }

    fn train(&mut self) -> Result<()> {
        let variant = self.variant();
        let json = self.json;
        let results = self.session.train()?;
        if json {
            let payload = report::to_json(results)?;
            return self.emit(&payload);
        }
        let mut text = report::section("Model comparison");
        text.push_str(&report::bench_table(results));
        match variant {
            Variant::Baseline => {
                text.push_str(&report::section("Accuracy"));
                text.push_str(&report::accuracy_chart(results, BAR_WIDTH));
            }
            Variant::Comparison => {
                text.push('\n');
                text.push_str(&report::best_model_note(results));
            }
        }
        self.emit(&text)
    }

    fn tune(&mut self) -> Result<()> {
        let json = self.json;
        let tuning = self.session.tune()?;
        let text = if json {
            report::to_json(tuning)?
        } else {
            format!(
                "{}{}",
                report::section("Hyperparameter tuning"),
                report::tuning_panel(tuning)
            )
        };
        self.emit(&text)?;
        if self.variant() == Variant::Comparison || self.show_explanation {
            self.explain()?;
        }
        Ok(())
    }

    fn explain(&mut self) -> Result<()> {
        let explanation = self.session.explain()?;
        if self.json {
            return self.emit_json(&ExplanationView {
                expected_value: explanation.shap.expected_value(),
                importance: &explanation.importance,
            });
        }
        let bar = format!(
            "{}{}",
            report::section("SHAP feature importance"),
            report::importance_chart(&explanation.importance, BAR_WIDTH)
        );
        let swarm = format!(
            "{}{}",
            report::section("SHAP summary"),
            report::beeswarm_chart(&explanation.feature_names, &explanation.beeswarm)
        );
        self.emit(&bar)?;
        self.emit(&swarm)
    }

    fn status(&mut self) -> Result<()> {
        let config = self.session.config();
        let view = StatusView {
            source: self.session.frame().map(|f| f.source()),
            rows: self.session.dataset().map(|d| d.n_rows()),
            test_size: config.test_size,
            seed: config.seed,
            variant: config.variant,
            trained: self.session.bench().is_some(),
            tuned: self.session.has_tuned_model(),
            explanation_shown: self.show_explanation,
        };
        let text = if self.json {
            report::to_json(&view)?
        } else {
            [
                output::kv("file", view.source.unwrap_or("-")),
                output::kv("rows", view.rows.map_or_else(|| "-".to_string(), |n| n.to_string())),
                output::kv("test size", view.test_size),
                output::kv("seed", view.seed),
                output::kv("variant", view.variant),
                output::kv("trained", view.trained),
                output::kv("tuned model", view.tuned),
                output::kv("explanation", if view.explanation_shown { "on" } else { "off" }),
            ]
            .join("\n")
        };
        self.emit(&text)
    }

    /// Shows a failed command without leaving the loop.
    pub(crate) fn report_error(&mut self, err: &CliError) -> Result<()> {
        tracing::debug!(error = %err, "command failed");
        let line = if err.is_warning() {
            output::warning(&err.to_string())
        } else {
            output::error(&err.to_string())
        };
        self.emit(&line)
    }

    /// Reads commands until `quit` or end of input.
    pub(crate) fn repl<R: BufRead>(&mut self, input: R, prompt: bool) -> Result<()> {
        if prompt {
            self.emit("Beneish M-Score dashboard. Type 'help' for commands.")?;
        }
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(self.out, "beneish> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>().and_then(|cmd| self.execute(cmd)) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => self.report_error(&err)?,
            }
        }
        Ok(())
    }
}
