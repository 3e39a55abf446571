//! Job configuration validation.
//!
//! Validates the `[job]` section of a launcher config before a descriptor
//! is built from it. A missing start date is deliberately NOT a config
//! error: the orchestrator reports it as a setup diagnostic, and the
//! launcher is expected to surface that path.

use crate::domain::error::AlgoprepError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_job_config(config: &dyn ConfigPort) -> Result<(), AlgoprepError> {
    validate_kind(config)?;
    validate_dates(config)?;
    validate_tier(config)?;
    Ok(())
}

fn validate_kind(config: &dyn ConfigPort) -> Result<(), AlgoprepError> {
    match config.get_string("job", "kind") {
        None => Err(AlgoprepError::ConfigMissing {
            section: "job".to_string(),
            key: "kind".to_string(),
        }),
        Some(s) if matches!(s.to_lowercase().as_str(), "backtest" | "live") => Ok(()),
        Some(s) => Err(AlgoprepError::ConfigInvalid {
            section: "job".to_string(),
            key: "kind".to_string(),
            reason: format!("unknown job kind '{s}', expected backtest or live"),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), AlgoprepError> {
    let end = match config.get_string("job", "end_date") {
        None => {
            return Err(AlgoprepError::ConfigMissing {
                section: "job".to_string(),
                key: "end_date".to_string(),
            });
        }
        Some(s) => parse_date(&s, "end_date")?,
    };

    // start_date is optional here; when present it must parse and precede
    // the end date.
    if let Some(s) = config.get_string("job", "start_date") {
        let start = parse_date(&s, "start_date")?;
        if start >= end {
            return Err(AlgoprepError::ConfigInvalid {
                section: "job".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AlgoprepError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| AlgoprepError::ConfigInvalid {
        section: "job".to_string(),
        key: field.to_string(),
        reason: format!("invalid {field} format, expected YYYY-MM-DD"),
    })
}

fn validate_tier(config: &dyn ConfigPort) -> Result<(), AlgoprepError> {
    match config.get_string("job", "tier") {
        None => Ok(()), // defaults to free
        Some(s) if matches!(s.to_lowercase().as_str(), "free" | "paid") => Ok(()),
        Some(s) => Err(AlgoprepError::ConfigInvalid {
            section: "job".to_string(),
            key: "tier".to_string(),
            reason: format!("unknown tier '{s}', expected free or paid"),
        }),
    }
}
