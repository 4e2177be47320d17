//! Hobart CLI binary.
//!
//! Command-line interface for the beta-adjusted anomaly detector.

mod integration;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use hobart::Benchmark;
use hobart_data::yahoo::{YahooBarProvider, YahooFundamentalsProvider};
use hobart_detect::{AnomalyDetector, DetectorConfig, detector::DEFAULT_LOOKBACK_DAYS};
use hobart_output::{AnomalyReport, ExportFormat, export_to_file};
use indicatif::{ProgressBar, ProgressStyle};
use integration::cache_manager;
use integration::data_pipeline::{FetchConfig, fetch_symbol_bars, scan_symbols};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: beta-adjusted anomaly detection", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect anomalies for a single stock
    Detect {
        /// Stock symbol
        symbol: String,

        /// Calendar lookback window in days
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        lookback_days: u32,

        /// Maximum number of events to report
        #[arg(long, default_value = "6")]
        max_results: usize,

        /// Benchmark index (sp500, nasdaq100, dow, russell2000)
        #[arg(long, default_value = "sp500")]
        benchmark: Benchmark,

        /// Use this beta instead of estimating one locally
        #[arg(long, conflicts_with = "provider_beta")]
        beta_override: Option<f64>,

        /// Fetch the provider-published beta and use it as the override
        #[arg(long)]
        provider_beta: bool,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,

        /// Output format (text, markdown, or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the events to a file (.csv or .json by extension)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Scan several stocks and summarize which ones have anomalies
    Scan {
        /// Stock symbols
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Calendar lookback window in days
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        lookback_days: u32,

        /// Benchmark index (sp500, nasdaq100, dow, russell2000)
        #[arg(long, default_value = "sp500")]
        benchmark: Benchmark,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,
    },

    /// Inspect or clear the bar cache
    Cache {
        /// Show cache statistics
        #[arg(long)]
        info: bool,

        /// Clear cached bars for one symbol
        #[arg(long)]
        clear_symbol: Option<String>,

        /// Clear the whole cache
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            symbol,
            lookback_days,
            max_results,
            benchmark,
            beta_override,
            provider_beta,
            no_cache,
            refresh,
            format,
            export,
        } => {
            let config = FetchConfig {
                use_cache: !no_cache,
                force_refresh: refresh,
            };
            detect_symbol(
                &symbol.to_uppercase(),
                lookback_days,
                max_results,
                benchmark,
                beta_override,
                provider_beta,
                config,
                &format,
                export,
            )
            .await?;
        }
        Commands::Scan {
            symbols,
            lookback_days,
            benchmark,
            no_cache,
            refresh,
        } => {
            let config = FetchConfig {
                use_cache: !no_cache,
                force_refresh: refresh,
            };
            scan(&symbols, lookback_days, benchmark, config).await?;
        }
        Commands::Cache {
            info,
            clear_symbol,
            clear,
        } => {
            cache_command(info, clear_symbol, clear)?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn detect_symbol(
    symbol: &str,
    lookback_days: u32,
    max_results: usize,
    benchmark: Benchmark,
    beta_override: Option<f64>,
    provider_beta: bool,
    config: FetchConfig,
    format: &str,
    export: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let end = Utc::now();
    let start = end - Duration::days(i64::from(lookback_days));

    let provider = YahooBarProvider::new();
    let stock_bars = fetch_symbol_bars(&provider, symbol, start, end, &config).await?;
    let benchmark_bars =
        fetch_symbol_bars(&provider, benchmark.symbol(), start, end, &config).await?;

    let beta_override = if provider_beta {
        let fundamentals = YahooFundamentalsProvider::new();
        let beta = fundamentals.fetch_beta(symbol).await?;
        if beta.is_none() {
            eprintln!("Warning: No provider beta for {}, estimating locally", symbol);
        }
        beta
    } else {
        beta_override
    };

    let detector = AnomalyDetector::new(DetectorConfig {
        max_results,
        ..DetectorConfig::default()
    });
    let detection = detector.detect(&stock_bars, &benchmark_bars, beta_override);

    let report = AnomalyReport::new(
        symbol,
        benchmark.symbol(),
        start.date_naive(),
        end.date_naive(),
        detection,
    );

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" => println!("{}", report.to_markdown()),
        _ => println!("{}", report.to_ascii_table()),
    }

    if let Some(path) = export {
        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::PrettyJson,
        };
        export_to_file(&report.detection.events, format, &path)?;
        println!("Exported {} event(s) to {}", report.detection.events.len(), path.display());
    }

    Ok(())
}

async fn scan(
    symbols: &[String],
    lookback_days: u32,
    benchmark: Benchmark,
    config: FetchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let end = Utc::now();
    let start = end - Duration::days(i64::from(lookback_days));

    let provider = YahooBarProvider::new();
    let benchmark_bars =
        fetch_symbol_bars(&provider, benchmark.symbol(), start, end, &config).await?;

    let symbols: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();

    let progress = ProgressBar::new(symbols.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    progress.set_message(format!("Scanning vs {}", benchmark.name()));

    let detector = AnomalyDetector::default();
    let outcomes = scan_symbols(
        &provider,
        &detector,
        &symbols,
        &benchmark_bars,
        None,
        start,
        end,
        &config,
        Some(&progress),
    )
    .await;
    progress.finish_and_clear();

    println!(
        "{:<8} {:>7} {:>8} {:<12} {:<17} {:<10}",
        "Symbol", "Window", "Events", "Latest", "Type", "Severity"
    );
    println!("{}", "-".repeat(68));

    for outcome in outcomes {
        match outcome.result {
            Ok(detection) => match detection.events.first() {
                Some(latest) => println!(
                    "{:<8} {:>7} {:>8} {:<12} {:<17} {:<10}",
                    outcome.symbol,
                    detection.diagnostics.window_size,
                    detection.events.len(),
                    latest.date.to_string(),
                    latest.kind.to_string(),
                    latest.severity.to_string()
                ),
                None => println!(
                    "{:<8} {:>7} {:>8} {:<12} {:<17} {:<10}",
                    outcome.symbol,
                    detection.diagnostics.window_size,
                    0,
                    "-",
                    "-",
                    "-"
                ),
            },
            Err(e) => println!("{:<8} fetch failed: {}", outcome.symbol, e),
        }
    }

    Ok(())
}

fn cache_command(
    info: bool,
    clear_symbol: Option<String>,
    clear: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache = cache_manager::open_cache()?;
    let cleared = clear || clear_symbol.is_some();

    if let Some(symbol) = clear_symbol {
        cache.clear_symbol(&symbol.to_uppercase())?;
        println!("Cleared cached bars for {}", symbol.to_uppercase());
    }

    if clear {
        cache.clear_all()?;
        println!("Cache cleared");
    }

    // With no clearing flags (or an explicit --info), show statistics.
    if info || !cleared {
        let stats = cache.get_stats()?;
        println!("Cache: {}", cache_manager::default_cache_path().display());
        println!("  Bars: {}", stats.total_bars);
        println!("  Symbols: {}", stats.unique_symbols);
    }

    Ok(())
}
