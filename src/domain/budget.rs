//! Runtime budget calculation for one backtest run.
//!
//! Maps the job's time range and the algorithm's data-subscription count to
//! a ceiling on how long the whole backtest may run. Pure and deterministic;
//! safe to call from concurrent setup attempts without coordination.

use crate::domain::job::AccountTier;
use chrono::NaiveDate;
use std::time::Duration;

/// Upper clamp on the computed budget: 12 hours.
pub const MAX_BUDGET: Duration = Duration::from_secs(12 * 3600);

/// Lower floor on the computed budget: 60 seconds.
pub const MIN_BUDGET: Duration = Duration::from_secs(60);

/// Seconds of budget granted per subscription per backtested day.
pub const SECONDS_PER_SUBSCRIPTION_DAY: i64 = 10;

/// Deployment knobs for the budget calculation.
///
/// `fixed_override` replaces the computed value unconditionally when set.
/// Historically this was hard-coded to 24 hours on one desktop operating
/// system; it is a configuration switch here because it conflicts with the
/// general formula. The override is never tier-doubled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetPolicy {
    pub fixed_override: Option<Duration>,
}

/// Maximum total run time for a backtest over `[start, finish]` with
/// `subscriptions` data subscriptions.
///
/// Base seconds are `10 x subscriptions x whole days`. The upper clamp to
/// 12 hours is checked before the 60 second floor, so a zero or negative
/// day count lands on the floor. The paid tier doubles the clamped value.
pub fn runtime_budget(
    start: NaiveDate,
    finish: NaiveDate,
    subscriptions: usize,
    tier: AccountTier,
    policy: &BudgetPolicy,
) -> Duration {
    if let Some(fixed) = policy.fixed_override {
        return fixed;
    }

    let days = finish.signed_duration_since(start).num_days();
    let base = SECONDS_PER_SUBSCRIPTION_DAY
        .saturating_mul(subscriptions as i64)
        .saturating_mul(days);

    let max = MAX_BUDGET.as_secs() as i64;
    let min = MIN_BUDGET.as_secs() as i64;
    let clamped = if base > max {
        max
    } else if base < min {
        min
    } else {
        base
    };

    let mut seconds = clamped as u64;
    if tier == AccountTier::Paid {
        seconds += seconds;
    }
    Duration::from_secs(seconds)
}
