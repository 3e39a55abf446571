//! CLI integration tests for the setup launcher.
//!
//! Tests cover:
//! - Argument parsing for both subcommands
//! - Job/policy construction from real INI files on disk
//! - Full setup attempts through `execute_setup`, success and failure paths

mod common;

use algoprep::adapters::file_config_adapter::FileConfigAdapter;
use algoprep::cli::{self, Cli, Command};
use algoprep::domain::error::AlgoprepError;
use algoprep::domain::setup::FREE_TIER_MAX_ORDERS;
use clap::Parser;
use common::date;
use std::io::Write;
use std::time::Duration;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[job]
kind = backtest
start_date = 2020-01-01
end_date = 2020-12-31
user_id = 1001
project_id = 7
tier = free

[algorithm]
symbols = SPY,QQQ

[setup]
load_deadline_secs = 15
init_deadline_secs = 10
"#;

mod argument_parsing {
    use super::*;

    #[test]
    fn setup_subcommand_parses() {
        let cli = Cli::try_parse_from(["algoprep", "setup", "--config", "job.ini"]).unwrap();
        match cli.command {
            Command::Setup { config, dry_run } => {
                assert_eq!(config.to_str(), Some("job.ini"));
                assert!(!dry_run);
            }
            other => panic!("expected setup, got {other:?}"),
        }
    }

    #[test]
    fn dry_run_flag_parses() {
        let cli =
            Cli::try_parse_from(["algoprep", "setup", "--config", "job.ini", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Command::Setup { dry_run: true, .. }));
    }

    #[test]
    fn validate_subcommand_parses() {
        let cli = Cli::try_parse_from(["algoprep", "validate", "--config", "job.ini"]).unwrap();
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn missing_config_is_a_parse_error() {
        assert!(Cli::try_parse_from(["algoprep", "setup"]).is_err());
    }
}

mod full_setup {
    use super::*;

    #[test]
    fn valid_config_sets_up_successfully() {
        let file = write_temp_ini(VALID_INI);
        let config = FileConfigAdapter::from_file(file.path()).unwrap();

        let attempt = cli::execute_setup(&config).unwrap();
        let result = &attempt.result;

        assert!(result.success, "{:?}", result.diagnostics);
        assert_eq!(result.effective_start, date(2020, 1, 1));
        approx::assert_relative_eq!(result.starting_capital, 100_000.0);
        assert_eq!(result.max_orders, Some(FREE_TIER_MAX_ORDERS));
        // Two equity subscriptions over 365 days: 10 x 2 x 365 = 7300s.
        assert_eq!(result.runtime_budget, Duration::from_secs(7300));
    }

    #[test]
    fn missing_start_date_surfaces_as_setup_diagnostic() {
        let file = write_temp_ini(
            "[job]\nkind = backtest\nend_date = 2020-12-31\n\n[algorithm]\nsymbols = SPY\n",
        );
        let config = FileConfigAdapter::from_file(file.path()).unwrap();

        let attempt = cli::execute_setup(&config).unwrap();
        assert!(!attempt.result.success);
        assert_eq!(attempt.result.diagnostics.len(), 1);
        assert!(attempt.result.diagnostics[0].contains("start date is unset"));
    }

    #[test]
    fn live_kind_fails_setup() {
        let file = write_temp_ini("[job]\nkind = live\nend_date = 2020-12-31\n");
        let config = FileConfigAdapter::from_file(file.path()).unwrap();

        let attempt = cli::execute_setup(&config).unwrap();
        assert!(!attempt.result.success);
        assert!(attempt.result.diagnostics[0].contains("invalid job kind"));
    }

    #[test]
    fn paid_tier_flows_through() {
        let file = write_temp_ini(
            "[job]\nkind = backtest\nstart_date = 2020-01-01\nend_date = 2020-12-31\ntier = paid\n\n[algorithm]\nsymbols = SPY\n",
        );
        let config = FileConfigAdapter::from_file(file.path()).unwrap();

        let attempt = cli::execute_setup(&config).unwrap();
        assert!(attempt.result.success);
        assert_eq!(attempt.result.max_orders, None);
        // 10 x 1 x 365 = 3650s, tier-doubled then unbounded-doubled.
        assert_eq!(attempt.result.runtime_budget, Duration::from_secs(14_600));
    }

    #[test]
    fn bad_tier_is_a_config_error() {
        let file = write_temp_ini("[job]\nkind = backtest\nend_date = 2020-12-31\ntier = gold\n");
        let config = FileConfigAdapter::from_file(file.path()).unwrap();

        let err = cli::execute_setup(&config).unwrap_err();
        assert!(matches!(err, AlgoprepError::ConfigInvalid { key, .. } if key == "tier"));
    }

    #[test]
    fn bad_policy_is_a_config_error() {
        let file = write_temp_ini(
            "[job]\nkind = backtest\nend_date = 2020-12-31\n\n[setup]\ninit_deadline_secs = 0\n",
        );
        let config = FileConfigAdapter::from_file(file.path()).unwrap();

        let err = cli::execute_setup(&config).unwrap_err();
        assert!(
            matches!(err, AlgoprepError::ConfigInvalid { key, .. } if key == "init_deadline_secs")
        );
    }
}
