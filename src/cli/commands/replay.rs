//! Replay command implementation.

use anyhow::{Context, Result};
use edge_config::AppConfig;
use edge_core::traits::BarSource;
use edge_core::types::EngineEvent;
use edge_data::CsvDataSource;
use edge_engine::{DashboardSnapshot, SignalEngine};
use edge_monitor::{EventJournal, JournalFormat, JournalSummary};
use serde::Serialize;
use std::io::{self, BufWriter};
use tracing::{info, warn};

use crate::cli::ReplayArgs;

/// Everything a replay produced, as saved with `--save`.
#[derive(Serialize)]
struct ReplayReport<'a> {
    symbol: &'a str,
    bars_loaded: usize,
    bars_rejected: usize,
    summary: JournalSummary,
    status: DashboardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [EngineEvent]>,
}

pub async fn run(args: ReplayArgs, config: &AppConfig) -> Result<()> {
    let format: JournalFormat = args.output.parse().map_err(anyhow::Error::msg)?;

    let mut engine =
        SignalEngine::new(config.engine.clone()).context("Invalid engine configuration")?;

    let mut source = CsvDataSource::new(&args.data)
        .with_context(|| format!("Data file '{}' not found", args.data.display()))?;
    if config.data.local_timestamps {
        source = source.with_naive_offset(config.engine.utc_offset_minutes);
    }
    let bars = source
        .load_bars(&args.symbol)
        .await
        .context("Failed to load bars")?;
    info!(symbol = %args.symbol, count = bars.len(), "Starting replay");

    let stdout = BufWriter::new(io::stdout());
    let mut journal = EventJournal::new(stdout, format, args.symbol.as_str());
    let mut saved = Vec::new();
    let mut rejected = 0;

    for bar in &bars {
        match engine.ingest(bar) {
            Ok(output) => {
                for event in &output.events {
                    journal.record(bar.timestamp, event)?;
                }
                if args.save.is_some() {
                    saved.extend(output.events);
                }
            }
            Err(e) => {
                warn!(timestamp = bar.timestamp, error = %e, "Skipping bar");
                rejected += 1;
            }
        }
    }
    journal.flush()?;
    let summary = journal.summary();
    drop(journal);

    let status = engine.status();
    info!(
        processed = status.bars_processed,
        rejected,
        signals = summary.long_signals + summary.short_signals,
        "Replay finished"
    );

    let report = ReplayReport {
        symbol: &args.symbol,
        bars_loaded: bars.len(),
        bars_rejected: rejected,
        summary,
        status,
        events: None,
    };

    match format {
        JournalFormat::Json => println!("{}", serde_json::to_string(&report)?),
        JournalFormat::Text => {
            println!();
            println!("{}", report.status);
            println!();
            println!("{}", report.summary);
            if rejected > 0 {
                println!("Rejected:    {} bars", rejected);
            }
        }
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let report = ReplayReport {
            events: Some(saved.as_slice()),
            ..report
        };
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(save_path, json)
            .await
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}
