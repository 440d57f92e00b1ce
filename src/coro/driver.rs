//! The trampoline that runs a stepwise computation to settlement.
//!
//! [`drive`] owns one computation for its whole run and alternates between
//! observing its next step and awaiting the outstanding suspension, so the
//! computation executes strictly sequentially with at most one pending
//! operation at a time. [`DriverSession`] is the detached variant: the run
//! continues even if the outward handle is dropped.
//!
//! Known limitation: there is no cancellation or timeout. Once a computation
//! is handed to a driver it runs to settlement. A caller wanting cancellation
//! must build it as a suspension that races the real operation against a
//! cancellation signal and resumes with a cancellation-flavoured failure.
//! Retry and backoff likewise belong to callers wrapping the outward handle.

use std::any::Any;
use std::fmt::{Display, Formatter};
use std::panic::resume_unwind;

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::step::{ProtocolViolation, Settlement, Step, Stepwise};

/// Drive a stepwise computation to its settlement.
///
/// A computation that never suspends settles on the first poll; the
/// trampoline introduces no asynchrony of its own. Suspensions are awaited
/// strictly one at a time, in the order the computation yields them, and
/// each operation's outcome is fed back in at the exact suspension point:
/// successes via `resume_with_value`, failures via `resume_with_failure`, so
/// the computation's own recovery logic gets first refusal on every failure.
///
/// # Errors
///
/// Returns the computation's own failing settlement: an operational failure
/// it did not locally recover from, or one it raised itself.
pub async fn drive<C: Stepwise>(mut computation: C) -> Result<C::Output, C::Error> {
    let mut suspensions: u32 = 0;
    let mut step = computation.advance();
    loop {
        let suspension = match step {
            Step::Settle(Settlement::Value(value)) => {
                debug!(suspensions, outcome = "value", "stepwise computation settled");
                return Ok(value);
            }
            Step::Settle(Settlement::Failure(failure)) => {
                debug!(suspensions, outcome = "failure", "stepwise computation settled");
                return Err(failure);
            }
            Step::Suspend(suspension) => suspension,
        };
        suspensions += 1;
        trace!(suspension = suspensions, "awaiting pending operation");
        step = match suspension.wait().await {
            Ok(value) => computation.resume_with_value(value),
            Err(failure) => computation.resume_with_failure(failure),
        };
    }
}

/// Failure classification on a [`DriverSession`]'s outward handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveError<E> {
    /// The computation settled as a failure (an uncaught operational
    /// failure, or one it raised itself).
    Failed(E),
    /// The computation panicked mid-step. A defect in the computation, not
    /// an asynchronous failure; reported as the failing settlement.
    Defect(String),
}

impl<E: Display> Display for DriveError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(failure) => write!(f, "computation failed: {failure}"),
            Self::Defect(msg) => write!(f, "computation defect: {msg}"),
        }
    }
}

impl<E: Display + std::fmt::Debug> std::error::Error for DriveError<E> {}

/// One driver invocation running detached on the ambient runtime.
///
/// The session owns its computation for the entire run and settles exactly
/// once. Dropping the session abandons the outward handle but never the run:
/// the computation is still driven to settlement, so no suspension is left
/// unobserved.
#[derive(Debug)]
pub struct DriverSession<T, E> {
    handle: JoinHandle<Result<T, E>>,
}

impl<T, E> DriverSession<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Take ownership of a fresh computation and start driving it.
    #[must_use]
    pub fn spawn<C>(computation: C) -> Self
    where
        C: Stepwise<Output = T, Error = E>,
    {
        Self {
            handle: tokio::spawn(drive(computation)),
        }
    }

    /// Await the single outward outcome of the run.
    ///
    /// # Errors
    ///
    /// [`DriveError::Failed`] carries the computation's failing settlement;
    /// [`DriveError::Defect`] reports a panic inside one of its steps.
    ///
    /// # Panics
    ///
    /// Re-raises a [`ProtocolViolation`] panic from the run. A contract
    /// breach aborts loudly instead of masquerading as a failed settlement.
    pub async fn outcome(self) -> Result<T, DriveError<E>> {
        match self.handle.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(failure)) => Err(DriveError::Failed(failure)),
            Err(join) if join.is_panic() => {
                let payload = join.into_panic();
                if payload.downcast_ref::<ProtocolViolation>().is_some() {
                    resume_unwind(payload);
                }
                Err(DriveError::Defect(describe_panic(payload.as_ref())))
            }
            Err(_) => Err(DriveError::Defect(
                "driver task cancelled before settling".into(),
            )),
        }
    }
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}
