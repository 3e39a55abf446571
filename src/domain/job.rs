//! Job descriptor: the immutable request describing one backtest run.

use chrono::NaiveDate;
use std::collections::HashMap;

/// Kind discriminator for a job packet. The setup core only accepts
/// [`JobKind::Backtest`]; live jobs belong to a different setup variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Backtest,
    Live,
}

/// Account classification affecting order-count and runtime-budget policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTier {
    Free,
    Paid,
}

/// An immutable value describing one backtest request.
///
/// Supplied externally; read-only to the setup core. The identifiers are
/// consumed for logging only.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    pub kind: JobKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub user_id: u64,
    pub project_id: u64,
    pub tier: AccountTier,
    pub metadata: HashMap<String, String>,
}

impl JobDescriptor {
    /// A backtest descriptor over `[start, end]` with no identifiers set.
    pub fn backtest(start: NaiveDate, end: NaiveDate) -> Self {
        JobDescriptor {
            kind: JobKind::Backtest,
            start_date: Some(start),
            end_date: end,
            user_id: 0,
            project_id: 0,
            tier: AccountTier::Free,
            metadata: HashMap::new(),
        }
    }
}
