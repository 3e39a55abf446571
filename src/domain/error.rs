//! Domain error types.

use std::fmt;
use std::time::Duration;

/// A fault raised inside user-supplied algorithm code.
///
/// Faults are never propagated as errors of the setup core itself; the
/// orchestrator converts each one into a diagnostic string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct AlgorithmFault(pub String);

impl AlgorithmFault {
    pub fn new(message: impl Into<String>) -> Self {
        AlgorithmFault(message.into())
    }
}

/// Errors produced while locating and instantiating an algorithm from a
/// loadable module.
// NOTE: `Display`/`Error` are hand-written rather than derived via
// `thiserror::Error` because every variant carries a field named `source`
// holding the module's source name. thiserror unconditionally treats a field
// named `source` as the underlying error source (there is no opt-out), which
// fails to compile for a `String`. The impls below reproduce exactly the
// messages the `#[error(...)]` attributes specified.
#[derive(Debug, Clone)]
pub enum LoadError {
    NoCandidate { source: String },

    AmbiguousCandidate { source: String, count: usize },

    Timeout { source: String, limit: Duration },

    ConstructionFailed { source: String, reason: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NoCandidate { source } => {
                write!(f, "no eligible algorithm found in module '{source}'")
            }
            LoadError::AmbiguousCandidate { source, count } => write!(
                f,
                "module '{source}' defines {count} eligible algorithms, expected exactly one"
            ),
            LoadError::Timeout { source, limit } => write!(
                f,
                "loading algorithm from module '{source}' timed out after {limit:?}"
            ),
            LoadError::ConstructionFailed { source, reason } => write!(
                f,
                "failed to construct algorithm from module '{source}': {reason}"
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Top-level error type for algoprep.
#[derive(Debug, thiserror::Error)]
pub enum AlgoprepError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("setup failed with {} diagnostic(s)", .diagnostics.len())]
    SetupFailed { diagnostics: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AlgoprepError> for std::process::ExitCode {
    fn from(err: &AlgoprepError) -> Self {
        let code: u8 = match err {
            AlgoprepError::Io(_) => 1,
            AlgoprepError::ConfigParse { .. }
            | AlgoprepError::ConfigMissing { .. }
            | AlgoprepError::ConfigInvalid { .. } => 2,
            AlgoprepError::Load(_) => 3,
            AlgoprepError::SetupFailed { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
