//! Algorithm module loading.
//!
//! An [`AlgorithmModule`] is an explicit registry of named algorithm
//! factories standing in for a loadable binary module; registration replaces
//! reflection-based type scanning while keeping the exactly-one-candidate
//! policy as an explicit validation step. Instantiation runs through the
//! deadline-bounded executor so pathological constructor code cannot stall
//! the pipeline.

use crate::domain::deadline::{RunOutcome, run_with_deadline};
use crate::domain::error::{AlgorithmFault, LoadError};
use crate::ports::algorithm_port::Algorithm;
use std::sync::Arc;
use std::time::Duration;

type Factory = Arc<dyn Fn() -> Result<Box<dyn Algorithm>, AlgorithmFault> + Send + Sync>;

/// A registry of candidate algorithm implementations from one module source.
#[derive(Clone)]
pub struct AlgorithmModule {
    source: String,
    entries: Vec<(String, Factory)>,
}

impl AlgorithmModule {
    /// An empty module identified by a source path or locator, used in
    /// diagnostics.
    pub fn new(source: impl Into<String>) -> Self {
        AlgorithmModule {
            source: source.into(),
            entries: Vec::new(),
        }
    }

    /// Register a candidate algorithm type under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Algorithm>, AlgorithmFault> + Send + Sync + 'static,
    {
        self.entries.push((name.into(), Arc::new(factory)));
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn candidate_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for AlgorithmModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmModule")
            .field("source", &self.source)
            .field("candidates", &self.candidate_names())
            .finish()
    }
}

/// Instantiate the single eligible algorithm in `module`.
///
/// Zero candidates or more than one candidate fail without running any user
/// code. Construction itself is bounded by `load_deadline`, a fixed policy
/// value independent of the backtest's runtime budget; it guards against
/// pathological static-initialization code, not slow `initialize` routines
/// (those are bounded separately by the orchestrator).
pub fn load_algorithm(
    module: &AlgorithmModule,
    load_deadline: Duration,
) -> Result<Box<dyn Algorithm>, LoadError> {
    let source = module.source.clone();
    let factory = match module.entries.as_slice() {
        [] => return Err(LoadError::NoCandidate { source }),
        [(_, factory)] => Arc::clone(factory),
        entries => {
            return Err(LoadError::AmbiguousCandidate {
                source,
                count: entries.len(),
            });
        }
    };

    match run_with_deadline(move || factory(), load_deadline) {
        RunOutcome::Completed(Ok(Ok(algorithm))) => Ok(algorithm),
        RunOutcome::Completed(Ok(Err(fault))) => Err(LoadError::ConstructionFailed {
            source,
            reason: fault.to_string(),
        }),
        RunOutcome::Completed(Err(fault)) => Err(LoadError::ConstructionFailed {
            source,
            reason: fault.message,
        }),
        RunOutcome::Expired => Err(LoadError::Timeout {
            source,
            limit: load_deadline,
        }),
    }
}
