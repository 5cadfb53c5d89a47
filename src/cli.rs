//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::batch::{BatchOutcome, execute_batch};
use crate::domain::error::TradeError;
use crate::domain::history::load_history_with_ids;
use crate::domain::price_table::{AssetId, PriceTable, RowLabel};
use crate::domain::settings::{IndexKind, RunConfig, build_run_config};
use crate::domain::trade::Trade;
use crate::domain::validation::{ValidationFlags, collect_failures};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "barrier-trade",
    about = "Execute barrier trades against historical prices"
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute every trade in the history file and write a JSON report
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override `[data] prices`
        #[arg(long)]
        prices: Option<PathBuf>,
        /// Override `[data] history`
        #[arg(long)]
        history: Option<PathBuf>,
        /// Override `[report] output`
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Load and validate trades without executing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line replacements for configured paths.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub prices: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl RunOverrides {
    fn apply(self, config: &mut RunConfig) {
        if let Some(prices) = self.prices {
            config.prices = prices;
        }
        if let Some(history) = self.history {
            config.history = history;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub trades: usize,
    pub settled: usize,
    pub failed: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            prices,
            history,
            output,
            dry_run,
        } => run_trades(
            &config,
            RunOverrides {
                prices,
                history,
                output,
            },
            dry_run,
        )
        .map(|_| ()),
        Command::Validate { config } => run_validate(&config).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<RunConfig, TradeError> {
    info!(path = %path.display(), "Loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    build_run_config(&adapter)
}

pub fn run_validate(config_path: &Path) -> Result<RunConfig, TradeError> {
    let config = load_config(config_path)?;
    eprintln!("Config validated successfully");
    eprintln!("  prices:         {}", config.prices.display());
    eprintln!("  history:        {}", config.history.display());
    eprintln!("  index:          {}", config.index);
    eprintln!("  barrier_search: {}", config.execution.search);
    eprintln!("  parallel:       {}", config.execution.parallel);
    eprintln!(
        "  validation:     {}",
        if config.validation.is_some() { "enabled" } else { "disabled" }
    );
    eprintln!("  output:         {}", config.output.display());
    Ok(config)
}

pub fn run_trades(
    config_path: &Path,
    overrides: RunOverrides,
    dry_run: bool,
) -> Result<RunSummary, TradeError> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);

    let data = CsvAdapter::new(config.prices.clone(), config.history.clone());
    let report = JsonReportAdapter::new();
    match config.index {
        IndexKind::Date => run_pipeline::<NaiveDate>(&data, &report, &config, dry_run),
        IndexKind::Integer => run_pipeline::<i64>(&data, &report, &config, dry_run),
    }
}

/// Load, screen, execute and report.
///
/// A dry run stops after screening and fails with the first validation error.
pub fn run_pipeline<I>(
    data: &dyn DataPort<I>,
    report: &dyn ReportPort<I>,
    config: &RunConfig,
    dry_run: bool,
) -> Result<RunSummary, TradeError>
where
    I: RowLabel + Send + Sync,
{
    // Stage 1: Load prices
    let table = data.fetch_prices()?;
    info!(
        rows = table.len(),
        assets = table.columns().len(),
        first = %table.first_label(),
        last = %table.last_label(),
        "Loaded price table"
    );

    // Stage 2: Load trades
    let rows = data.fetch_history()?;
    let trades = load_history_with_ids(&rows)?;
    info!(trades = trades.len(), rows = rows.len(), "Loaded trade history");
    let order: Vec<String> = trades.iter().map(|(id, _)| id.clone()).collect();

    // Stage 3: Screen
    let (accepted, rejected) = screen(trades, &table, config.validation.as_ref());
    for (trade_id, failures) in &rejected {
        for failure in failures {
            warn!(trade_id = %trade_id, error = %failure, "Trade rejected");
        }
    }

    if dry_run {
        eprintln!(
            "Dry run: {} valid, {} invalid of {} trades",
            accepted.len(),
            rejected.len(),
            order.len()
        );
        for (trade_id, failures) in &rejected {
            for failure in failures {
                eprintln!("  {}: {}", trade_id, failure);
            }
        }
        return match rejected.into_iter().find_map(|(_, f)| f.into_iter().next()) {
            Some(first) => Err(first),
            None => Ok(RunSummary {
                trades: order.len(),
                ..RunSummary::default()
            }),
        };
    }

    // Stage 4: Execute
    info!(
        trades = accepted.len(),
        search = %config.execution.search,
        parallel = config.execution.parallel,
        "Executing trades"
    );
    let executed = execute_batch(accepted, &table, &config.execution);

    let mut by_id: HashMap<String, BatchOutcome<I, String>> = executed
        .into_iter()
        .map(|o| (o.trade_id.clone(), o))
        .collect();
    for (trade_id, failures) in rejected {
        if let Some(first) = failures.into_iter().next() {
            by_id.insert(
                trade_id.clone(),
                BatchOutcome {
                    trade_id,
                    result: Err(first),
                },
            );
        }
    }
    let outcomes: Vec<BatchOutcome<I, String>> =
        order.iter().filter_map(|id| by_id.remove(id)).collect();

    let summary = RunSummary {
        trades: outcomes.len(),
        settled: outcomes.iter().filter(|o| o.is_ok()).count(),
        failed: outcomes.iter().filter(|o| !o.is_ok()).count(),
    };

    // Stage 5: Report
    report.write(&outcomes, &config.output)?;
    info!(
        path = %config.output.display(),
        settled = summary.settled,
        failed = summary.failed,
        "Report written"
    );
    eprintln!(
        "{} trades: {} settled, {} failed. Report written to: {}",
        summary.trades,
        summary.settled,
        summary.failed,
        config.output.display()
    );
    Ok(summary)
}

type Screened<I, A> = (Vec<(String, Trade<I, A>)>, Vec<(String, Vec<TradeError>)>);

/// Split trades into those passing every enabled check and those that don't.
fn screen<I: RowLabel, A: AssetId>(
    trades: Vec<(String, Trade<I, A>)>,
    table: &PriceTable<I, A>,
    flags: Option<&ValidationFlags>,
) -> Screened<I, A> {
    let Some(flags) = flags else {
        return (trades, Vec::new());
    };
    let mut accepted = Vec::with_capacity(trades.len());
    let mut rejected = Vec::new();
    for (trade_id, trade) in trades {
        let failures = collect_failures(&trade, table, flags);
        if failures.is_empty() {
            accepted.push((trade_id, trade));
        } else {
            rejected.push((trade_id, failures));
        }
    }
    (accepted, rejected)
}
