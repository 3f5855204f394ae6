use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Parser;
use compound_palette::{AssignerConfig, ColorAssigner, LegendEntry, ManualClock};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "compound-replay",
    author,
    version,
    about = "Replay a trace of compound lookups against a color assigner",
    long_about = None
)]
pub struct Cli {
    /// JSON Lines trace, one `{"at": <RFC 3339>, "label": <compound>}` per line
    #[arg(long, value_name = "TRACE_FILE")]
    pub trace: PathBuf,

    /// Assigner settings (timeout and palette); falls back to the user config
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Destination for the JSON report; printed to stdout when omitted
    #[arg(long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TraceEvent {
    pub at: DateTime<Utc>,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct Lookup {
    pub at: DateTime<Utc>,
    pub label: String,
    pub color: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub lookups: Vec<Lookup>,
    pub legend: Vec<LegendEntry>,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                bail!("config file '{}' does not exist", path.display());
            }
            AssignerConfig::load_from_path(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?
        }
        None => AssignerConfig::load().context("failed to load user config")?,
    };

    let events = read_trace(&cli.trace)?;
    let report = replay(&config, &events)?;

    let json = serde_json::to_vec_pretty(&report)?;
    match &cli.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!(
                            "failed to create output parent directory '{}'",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(output, &json)
                .with_context(|| format!("failed to write report to '{}'", output.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&json)?;
            stdout.write_all(b"\n")?;
        }
    }

    info!(
        target: "compound_palette::replay",
        trace = %cli.trace.display(),
        lookups = report.lookups.len(),
        failed = report.lookups.iter().filter(|lookup| lookup.error.is_some()).count(),
        legend = report.legend.len(),
        "replay completed"
    );

    Ok(())
}

pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open trace '{}'", path.display()))?;

    let mut events = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read trace line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: TraceEvent = serde_json::from_str(&line)
            .with_context(|| format!("malformed trace event on line {line_number}"))?;
        events.push(event);
    }

    Ok(events)
}

/// Drives a fresh assigner through `events`, moving a manual clock to each
/// event's offset from the first one. Exhaustion is recorded, not fatal.
pub fn replay(config: &AssignerConfig, events: &[TraceEvent]) -> Result<ReplayReport> {
    let clock = ManualClock::new();
    let mut assigner = ColorAssigner::from_config_with_clock(config, clock.clone())
        .context("invalid assigner config")?;

    let mut lookups = Vec::with_capacity(events.len());
    let mut previous: Option<DateTime<Utc>> = None;
    let origin = events.first().map(|event| event.at);

    for (index, event) in events.iter().enumerate() {
        if let Some(previous) = previous {
            if event.at < previous {
                bail!(
                    "trace event {} at {} is earlier than the event before it ({})",
                    index + 1,
                    event.at,
                    previous
                );
            }
        }
        previous = Some(event.at);

        if let Some(origin) = origin {
            let offset = (event.at - origin)
                .to_std()
                .context("trace offset out of range")?;
            clock.set_elapsed(offset);
        }

        let lookup = match assigner.color_for(&event.label) {
            Ok(color) => Lookup {
                at: event.at,
                label: event.label.clone(),
                color: Some(color.to_hex()),
                error: None,
            },
            Err(err) => Lookup {
                at: event.at,
                label: event.label.clone(),
                color: None,
                error: Some(err.to_string()),
            },
        };
        lookups.push(lookup);
    }

    Ok(ReplayReport {
        lookups,
        legend: assigner.legend(),
    })
}
