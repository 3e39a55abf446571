//! Deadline-bounded execution of arbitrary, possibly hostile work.
//!
//! User-supplied algorithm code may loop forever or panic; neither may stall
//! or crash the setup pipeline. [`run_with_deadline`] runs the work on a
//! separate worker thread and waits at most the given duration for a result.
//!
//! Known limitation: on expiry the worker thread is abandoned, not killed.
//! Rust offers no safe preemptive thread cancellation, so the work's side
//! effects may continue after the caller has been unblocked. Callers must
//! only rely on being unblocked, never on the work having stopped.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// A fault captured from a bounded unit of work: either a panic payload or
/// a worker that died before producing a result.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct WorkFault {
    pub message: String,
}

/// Outcome of one deadline-bounded run.
#[derive(Debug)]
pub enum RunOutcome<T> {
    /// The work finished within the deadline: either its value or the fault
    /// it raised. Faults from the work are surfaced here as values so the
    /// caller decides how to log or report them; they are never propagated
    /// as faults of the executor itself.
    Completed(Result<T, WorkFault>),
    /// The deadline elapsed first. The in-flight execution is abandoned,
    /// not waited upon further.
    Expired,
}

impl<T> RunOutcome<T> {
    pub fn is_expired(&self) -> bool {
        matches!(self, RunOutcome::Expired)
    }
}

/// Run `work` on a worker thread, waiting at most `limit` for it to finish.
///
/// A panic inside `work` is caught on the worker and returned as
/// `Completed(Err(fault))`. The caller is unblocked no later than `limit`
/// (plus scheduling jitter) regardless of what the work does.
pub fn run_with_deadline<T, F>(work: F, limit: Duration) -> RunOutcome<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = catch_unwind(AssertUnwindSafe(work)).map_err(|payload| WorkFault {
            message: panic_message(payload.as_ref()),
        });
        // The receiver may already have given up; a failed send is fine.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(limit) {
        Ok(Ok(value)) => RunOutcome::Completed(Ok(value)),
        Ok(Err(fault)) => RunOutcome::Completed(Err(fault)),
        Err(RecvTimeoutError::Timeout) => RunOutcome::Expired,
        Err(RecvTimeoutError::Disconnected) => RunOutcome::Completed(Err(WorkFault {
            message: "worker terminated without producing a result".to_string(),
        })),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked without a message".to_string()
    }
}
