use std::collections::HashMap;

use anyhow::{Context, Result};
use catalog_clean::columns::{suggest_mapping, ColumnMapping};
use catalog_clean::{Pipeline, PipelineConfig};
use catalog_export::Destination;
use catalog_model::{BatchResult, RawRecord};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Book catalog feed cleaning, scoring and export tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Pipeline config JSON (missing keys keep their defaults)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw feed rows into storefront-ready records
    Normalize {
        /// JSON array of row objects, keyed by the feed's own column headers
        #[arg(short, long)]
        input: String,

        /// Output path for the batch result JSON
        #[arg(short, long, default_value = "normalized.json")]
        output: String,

        /// Process rows on the current thread only
        #[arg(long)]
        sequential: bool,
    },

    /// Project normalized records into a destination schema
    Export {
        /// Batch result JSON written by `normalize`
        #[arg(short, long)]
        input: String,

        /// Destination schema: storefront or bulk-import
        #[arg(short, long, default_value = "storefront")]
        destination: Destination,

        /// Output path for the destination rows JSON
        #[arg(short, long, default_value = "export.json")]
        output: String,
    },

    /// Report catalog statistics for a normalized batch
    Summary {
        /// Batch result JSON written by `normalize`
        #[arg(short, long)]
        input: String,
    },

    /// Show which feed columns would feed which record fields
    Columns {
        /// JSON array of row objects
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path, "Loading pipeline config");
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Normalize {
            input,
            output,
            sequential,
        } => {
            tracing::info!(input = %input, output = %output, "Normalizing feed rows");
            let rows = read_rows(&input)?;
            let headers = collect_headers(&rows);
            let mapping = suggest_mapping(&headers);
            log_mapping(&mapping);

            let records: Vec<RawRecord> = rows.iter().map(|row| mapping.apply(&stringify(row))).collect();
            let pipeline = Pipeline::new(PipelineConfig {
                use_parallel: config.use_parallel && !sequential,
                ..config
            })?;
            let result = pipeline.process_batch(&records);

            for failure in &result.failures {
                tracing::warn!(row = failure.index, id = ?failure.identifier, "{}", failure.reason);
            }
            for w in &result.warnings {
                tracing::debug!(row = w.index, id = %w.identifier, "{}", w.warning);
            }

            let json = serde_json::to_string_pretty(&result)?;
            std::fs::write(&output, &json).with_context(|| format!("writing {output}"))?;
            tracing::info!(
                normalized = result.successes.len(),
                failures = result.failures.len(),
                warnings = result.warnings.len(),
                path = %output,
                "Wrote batch result"
            );
        }
        Commands::Export {
            input,
            destination,
            output,
        } => {
            tracing::info!(input = %input, destination = %destination, output = %output, "Exporting");
            let result = read_batch(&input)?;
            let rows = destination.map_all(&result.successes);
            let json = serde_json::to_string_pretty(&rows)?;
            std::fs::write(&output, &json).with_context(|| format!("writing {output}"))?;
            tracing::info!(
                rows = rows.len(),
                columns = destination.headers().len(),
                path = %output,
                "Wrote destination rows"
            );
        }
        Commands::Summary { input } => {
            let result = read_batch(&input)?;
            let summary = result.summary();
            tracing::info!(
                rows = summary.total_rows,
                normalized = summary.normalized,
                failures = summary.failures,
                warnings = summary.warnings,
                "Batch"
            );
            tracing::info!(
                in_stock = summary.in_stock,
                out_of_stock = summary.out_of_stock,
                on_backorder = summary.on_backorder,
                in_stock_pct = summary.in_stock_percentage,
                "Availability"
            );
            tracing::info!(
                dirty = summary.dirty,
                clean = summary.clean,
                mean_score = summary.mean_quality_score,
                "Quality"
            );
            tracing::info!(
                min = %summary.min_price,
                max = %summary.max_price,
                mean = %summary.mean_price,
                total_value = %summary.total_value,
                "Prices"
            );
            for (category, count) in &summary.categories {
                tracing::info!(category = %category, count, "Category");
            }
        }
        Commands::Columns { input } => {
            let rows = read_rows(&input)?;
            let headers = collect_headers(&rows);
            tracing::info!(headers = headers.len(), rows = rows.len(), "Read feed headers");
            log_mapping(&suggest_mapping(&headers));
        }
    }

    Ok(())
}

fn read_rows(path: &str) -> Result<Vec<Map<String, Value>>> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{path} is not a JSON array of row objects"))
}

fn read_batch(path: &str) -> Result<BatchResult> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&contents).with_context(|| format!("{path} is not a batch result"))
}

/// Every header seen across the rows, in first-seen order.
fn collect_headers(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if !headers.contains(key) {
            headers.push(key.clone());
        }
    }
    headers
}

/// Feed values as text. Spreadsheet exports often type prices and stock
/// as JSON numbers; nulls count as absent.
fn stringify(row: &Map<String, Value>) -> HashMap<String, String> {
    row.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

fn log_mapping(mapping: &ColumnMapping) {
    for (column, header) in mapping.iter() {
        tracing::info!(field = column.key(), header = %header, "Mapped column");
    }
    for column in mapping.unmapped() {
        tracing::warn!(field = column.key(), "No column found");
    }
}
