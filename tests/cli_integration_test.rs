//! CLI integration tests for the run and validate commands.
//!
//! Tests cover:
//! - Config loading and validation from real INI files on disk
//! - Full run over CSV prices and history, with the JSON report on disk
//! - Dry-run screening and command-line path overrides
//! - Pipeline orchestration with a mock data port

mod common;

use barrier_trade::adapters::json_report_adapter::JsonReportAdapter;
use barrier_trade::cli::{self, RunOverrides, RunSummary};
use barrier_trade::domain::barrier::BarrierSearch;
use barrier_trade::domain::error::TradeError;
use barrier_trade::domain::settings::IndexKind;
use common::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PRICES: &str = "\
date,BHP,CBA
2024-01-02,100.0,50.0
2024-01-03,101.0,50.5
2024-01-04,103.0,51.0
2024-01-05,106.0,49.0
2024-01-08,104.0,48.0
";

const HISTORY: &str = "\
trade_id,asset,lot,entry,exit,take,stop
pair,BHP,1,2024-01-03,2024-01-08,4.0,
pair,CBA,-1,2024-01-03,2024-01-08,4.0,
hold,CBA,2,,,,
typo,WBC,1,,,,
";

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let prices = write_file(dir.path(), "prices.csv", PRICES);
        let history = write_file(dir.path(), "history.csv", HISTORY);
        let output = dir.path().join("report.json");
        let ini = format!(
            "[data]\nprices = {}\nhistory = {}\nindex = date\n\n[report]\noutput = {}\n\n{}",
            prices.display(),
            history.display(),
            output.display(),
            extra
        );
        let config = write_file(dir.path(), "run.ini", &ini);
        Fixture { dir, config }
    }

    fn report_path(&self) -> PathBuf {
        self.dir.path().join("report.json")
    }

    fn report(&self) -> Vec<Value> {
        let content = std::fs::read_to_string(self.report_path()).unwrap();
        serde_json::from_str::<Value>(&content)
            .unwrap()
            .as_array()
            .unwrap()
            .clone()
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn validate_accepts_complete_config() {
        let fx = Fixture::new("[execution]\nbarrier_search = sorted\nparallel = true\n");
        let config = cli::run_validate(&fx.config).unwrap();
        assert_eq!(config.index, IndexKind::Date);
        assert_eq!(config.execution.search, BarrierSearch::Sorted);
        assert!(config.execution.parallel);
        assert_eq!(config.output, fx.report_path());
    }

    #[test]
    fn validate_rejects_missing_history() {
        let dir = TempDir::new().unwrap();
        let config = write_file(dir.path(), "run.ini", "[data]\nprices = p.csv\n");
        let err = cli::run_validate(&config).unwrap_err();
        assert!(matches!(err, TradeError::ConfigMissing { ref key, .. } if key == "history"));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        let err = cli::run_validate(Path::new("/nonexistent/run.ini")).unwrap_err();
        assert!(matches!(err, TradeError::ConfigParse { .. }));
    }
}

mod full_run {
    use super::*;

    #[test]
    fn run_writes_report_in_history_order() {
        let fx = Fixture::new("");
        let summary = cli::run_trades(&fx.config, RunOverrides::default(), false).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                trades: 3,
                settled: 2,
                failed: 1
            }
        );

        let report = fx.report();
        assert_eq!(report.len(), 3);

        // Spread PnL from 2024-01-03: 0, 1.5, 6.5 -> take fires on 2024-01-05.
        assert_eq!(report[0]["trade_id"], "pair");
        assert_eq!(report[0]["record"]["close"], "2024-01-05");
        assert_eq!(report[0]["pnl"][0], 5.0);
        assert_eq!(report[0]["pnl"][1], 1.5);

        assert_eq!(report[1]["trade_id"], "hold");
        assert_eq!(report[1]["record"]["close"], "2024-01-08");
        assert_eq!(report[1]["pnl"][0], -4.0);

        assert_eq!(report[2]["trade_id"], "typo");
        assert!(report[2]["error"].as_str().unwrap().contains("WBC"));
    }

    #[test]
    fn output_override_redirects_report() {
        let fx = Fixture::new("");
        let elsewhere = fx.dir.path().join("other.json");
        cli::run_trades(
            &fx.config,
            RunOverrides {
                output: Some(elsewhere.clone()),
                ..RunOverrides::default()
            },
            false,
        )
        .unwrap();
        assert!(elsewhere.exists());
        assert!(!fx.report_path().exists());
    }

    #[test]
    fn dry_run_reports_validation_failure_without_writing() {
        let fx = Fixture::new("");
        let err = cli::run_trades(&fx.config, RunOverrides::default(), true).unwrap_err();
        assert!(matches!(err, TradeError::Validation { field: "asset", .. }));
        assert!(!fx.report_path().exists());
    }

    #[test]
    fn disabled_validation_still_isolates_failures() {
        let fx = Fixture::new("[validation]\nenabled = false\n");
        let summary = cli::run_trades(&fx.config, RunOverrides::default(), false).unwrap();
        assert_eq!(summary.failed, 1);
        let report = fx.report();
        assert!(
            report[2]["error"]
                .as_str()
                .unwrap()
                .contains("not found in price table")
        );
    }

    #[test]
    fn missing_prices_file_is_data_error() {
        let fx = Fixture::new("");
        let err = cli::run_trades(
            &fx.config,
            RunOverrides {
                prices: Some(fx.dir.path().join("absent.csv")),
                ..RunOverrides::default()
            },
            false,
        )
        .unwrap_err();
        assert!(matches!(err, TradeError::Data { .. }));
        assert_eq!(err.exit_status(), 1);
    }
}

mod pipeline {
    use super::*;
    use barrier_trade::domain::execution::ExecutionConfig;
    use barrier_trade::domain::settings::RunConfig;
    use barrier_trade::domain::validation::ValidationFlags;

    fn run_config(output: PathBuf) -> RunConfig {
        RunConfig {
            prices: PathBuf::from("unused.csv"),
            history: PathBuf::from("unused.csv"),
            index: IndexKind::Integer,
            execution: ExecutionConfig::default(),
            validation: Some(ValidationFlags::default()),
            output,
        }
    }

    #[test]
    fn mock_data_port_runs_end_to_end() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.json");
        let port = MockDataPort::new(universe()).with_rows(vec![
            history_row("t1", "A0", 1.0, Some(1), Some(6), Some(2.0), None),
            history_row("t2", "A0", -1.0, Some(1), Some(6), None, Some(-2.0)),
        ]);

        let summary =
            cli::run_pipeline(&port, &JsonReportAdapter::new(), &run_config(output.clone()), false)
                .unwrap();
        assert_eq!(summary.settled, 2);

        let report: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report[0]["record"]["close"], 3);
        assert_eq!(report[1]["record"]["close"], 3);
        assert_eq!(report[1]["pnl"][0], -2.0);
    }

    #[test]
    fn data_port_failure_aborts_run() {
        let dir = TempDir::new().unwrap();
        let port = MockDataPort::new(universe()).with_error("connection refused");
        let err = cli::run_pipeline(
            &port,
            &JsonReportAdapter::new(),
            &run_config(dir.path().join("out.json")),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, TradeError::Data { ref reason } if reason == "connection refused"));
    }
}
