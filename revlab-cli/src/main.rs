//! RevLab CLI — backtest, sweep and interval commands.
//!
//! Commands:
//! - `backtest` — load candles, run the reversal strategy, print result JSON
//! - `sweep` — run a profit-target × stop-loss grid and print a ranked table
//! - `interval` — print the normalized form of an interval token
//!
//! Logs go to stderr; stdout carries only command output.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use revlab_core::data::{BinanceSource, CandleSource, CsvSource, SourceKind, SyntheticSource};
use revlab_core::domain::Candle;
use revlab_core::fingerprint::RunFingerprint;
use revlab_core::sweep::{rank_entries, run_sweep, SweepGrid};
use revlab_core::{normalize_interval, run_configured, BacktestConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "revlab",
    about = "RevLab CLI — candle-reversal backtesting engine"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest and print the result as JSON.
    Backtest {
        #[command(flatten)]
        run: RunArgs,

        /// Write the JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the run fingerprint to stderr.
        #[arg(long, default_value_t = false)]
        fingerprint: bool,
    },
    /// Sweep profit-target and stop-loss values over one candle series.
    Sweep {
        #[command(flatten)]
        run: RunArgs,

        /// Comma-separated profit targets in percent.
        #[arg(long, value_delimiter = ',', default_values_t = [2.0, 4.0, 6.0])]
        profit_targets: Vec<f64>,

        /// Comma-separated stop losses in percent.
        #[arg(long, value_delimiter = ',', default_values_t = [5.0, 10.0])]
        stop_losses: Vec<f64>,
    },
    /// Print the normalized exchange code for an interval token.
    Interval {
        token: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Binance,
    Csv,
    Synthetic,
}

impl From<SourceArg> for SourceKind {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Binance => SourceKind::Binance,
            SourceArg::Csv => SourceKind::Csv,
            SourceArg::Synthetic => SourceKind::Synthetic,
        }
    }
}

/// Options shared by `backtest` and `sweep`. Flags override the config file.
#[derive(Args)]
struct RunArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// CSV file for `--source csv`.
    #[arg(long)]
    csv: Option<PathBuf>,

    #[arg(long)]
    symbol: Option<String>,

    /// Interval token (normalized, e.g. 60m → 1h).
    #[arg(long)]
    interval: Option<String>,

    #[arg(long)]
    limit: Option<usize>,

    /// Take-profit distance in percent.
    #[arg(long)]
    profit_target: Option<f64>,

    /// Stop-loss distance in percent.
    #[arg(long)]
    stop_loss: Option<f64>,

    /// Seed for `--source synthetic`.
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn load_config(&self) -> Result<BacktestConfig> {
        let mut config = match &self.config {
            Some(path) => BacktestConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BacktestConfig::default(),
        };

        if let Some(source) = self.source {
            config.source.kind = source.into();
        }
        if let Some(csv) = &self.csv {
            config.source.csv_path = Some(csv.clone());
            if self.source.is_none() {
                config.source.kind = SourceKind::Csv;
            }
        }
        if let Some(symbol) = &self.symbol {
            config.source.symbol = symbol.clone();
        }
        if let Some(interval) = &self.interval {
            config.backtest.interval = interval.clone();
        }
        if let Some(limit) = self.limit {
            config.source.limit = limit;
        }
        if let Some(tp) = self.profit_target {
            config.backtest.profit_target_percent = tp;
        }
        if let Some(sl) = self.stop_loss {
            config.backtest.stop_loss_percent = sl;
        }
        if let Some(seed) = self.seed {
            config.source.seed = seed;
        }

        config.validate().context("invalid options")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Backtest {
            run,
            output,
            fingerprint,
        } => run_backtest_cmd(&run, output, fingerprint),
        Commands::Sweep {
            run,
            profit_targets,
            stop_losses,
        } => run_sweep_cmd(&run, SweepGrid::new(profit_targets, stop_losses)),
        Commands::Interval { token } => {
            println!("{}", normalize_interval(&token));
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_candles(config: &BacktestConfig) -> Result<Vec<Candle>> {
    let source: Box<dyn CandleSource> = match config.source.kind {
        SourceKind::Binance => Box::new(
            BinanceSource::new(
                config.source.base_url.clone(),
                Duration::from_secs(config.source.timeout_secs),
            )
            .context("building Binance client")?,
        ),
        SourceKind::Csv => {
            let path = config
                .source
                .csv_path
                .clone()
                .context("csv source needs --csv or source.csv_path")?;
            Box::new(CsvSource::new(path))
        }
        SourceKind::Synthetic => Box::new(SyntheticSource::new(config.source.seed)),
    };

    let request = config.candle_request();
    let candles = source.fetch(&request).with_context(|| {
        format!(
            "fetching {} {} candles from {}",
            request.symbol,
            request.interval,
            source.name()
        )
    })?;
    info!(
        source = source.name(),
        symbol = %request.symbol,
        interval = %request.interval,
        candles = candles.len(),
        "candles loaded"
    );
    Ok(candles)
}

fn run_backtest_cmd(args: &RunArgs, output: Option<PathBuf>, fingerprint: bool) -> Result<()> {
    let config = args.load_config()?;
    let candles = load_candles(&config)?;
    let result = run_configured(candles, &config).context("running backtest")?;

    let summary = result.summary();
    info!(
        trades = result.n_trades,
        wins = summary.wins,
        losses = summary.losses,
        forced = summary.forced,
        final_balance = result.final_balance,
        "backtest finished"
    );

    if fingerprint {
        let fp = RunFingerprint::compute(&result, &config).context("fingerprinting run")?;
        eprintln!("dataset: {}", fp.dataset_hash);
        eprintln!("params:  {}", fp.params_hash);
        eprintln!("result:  {}", fp.result_hash);
    }

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "result written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_sweep_cmd(args: &RunArgs, grid: SweepGrid) -> Result<()> {
    let config = args.load_config()?;
    let candles = load_candles(&config)?;
    info!(runs = grid.size(), "starting sweep");

    let mut entries = run_sweep(&candles, &config, &grid).context("running sweep")?;
    rank_entries(&mut entries);

    println!(
        "{:>8} {:>8} {:>14} {:>7} {:>8}",
        "TP %", "SL %", "Final", "Trades", "Win %"
    );
    println!("{}", "-".repeat(49));
    for e in &entries {
        println!(
            "{:>8.2} {:>8.2} {:>14.2} {:>7} {:>8.1}",
            e.profit_target_percent,
            e.stop_loss_percent,
            e.final_balance,
            e.n_trades,
            e.win_rate * 100.0
        );
    }
    Ok(())
}
