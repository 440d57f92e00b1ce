//! The step protocol: the contract a stepwise computation presents to a driver.
//!
//! A stepwise computation is an owned, single-use state machine. Each time it
//! is advanced or resumed it produces a [`Step`]: either a [`Suspension`]
//! (one pending asynchronous operation it wants to wait on) or a
//! [`Settlement`] (its single terminal outcome). A driver alternates between
//! observing steps and resuming the computation with the suspension's result,
//! so remote failures surface inside the computation exactly where it
//! suspended and can be handled by its own recovery logic.

use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::panic::panic_any;

use futures_util::future::BoxFuture;

/// One pending asynchronous operation a computation is waiting on.
///
/// Carries no identity beyond the operation itself. A driver holds at most
/// one outstanding suspension per computation at any time.
pub struct Suspension<V, E> {
    operation: BoxFuture<'static, Result<V, E>>,
}

impl<V, E> Suspension<V, E> {
    /// Wrap a pending operation that eventually yields a value or fails.
    #[must_use]
    pub fn new<F>(operation: F) -> Self
    where
        F: Future<Output = Result<V, E>> + Send + 'static,
    {
        Self {
            operation: Box::pin(operation),
        }
    }

    /// Await the wrapped operation. Consumes the suspension; a suspension is
    /// observed exactly once.
    pub(crate) async fn wait(self) -> Result<V, E> {
        self.operation.await
    }
}

impl<V, E> Debug for Suspension<V, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Suspension(..)")
    }
}

/// The single terminal outcome of a stepwise computation.
///
/// Exactly one settlement occurs per computation; it is immutable once
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement<T, E> {
    /// The computation returned normally.
    Value(T),
    /// An uncaught failure reached the top of the computation.
    Failure(E),
}

impl<T, E> Settlement<T, E> {
    /// Convert into the standard result form handed to callers.
    ///
    /// # Errors
    ///
    /// Returns the settlement's failure value when the computation failed.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }
}

/// What a computation produces at each protocol point.
#[derive(Debug)]
pub enum Step<V, T, E> {
    /// The computation wants to wait on an asynchronous operation.
    Suspend(Suspension<V, E>),
    /// The computation reached its terminal outcome.
    Settle(Settlement<T, E>),
}

impl<V, T, E> Step<V, T, E> {
    /// Suspend on a pending operation.
    #[must_use]
    pub fn suspend<F>(operation: F) -> Self
    where
        F: Future<Output = Result<V, E>> + Send + 'static,
    {
        Self::Suspend(Suspension::new(operation))
    }

    /// Settle with a final value.
    #[must_use]
    pub fn value(value: T) -> Self {
        Self::Settle(Settlement::Value(value))
    }

    /// Settle with a final failure.
    #[must_use]
    pub fn failure(failure: E) -> Self {
        Self::Settle(Settlement::Failure(failure))
    }
}

/// The contract a stepwise computation must satisfy so any driver can run it.
///
/// Call order is fixed: [`advance`](Stepwise::advance) exactly once as the
/// very first step, then, after each returned [`Suspension`] resolves,
/// exactly one of [`resume_with_value`](Stepwise::resume_with_value) or
/// [`resume_with_failure`](Stepwise::resume_with_failure), until a
/// [`Settlement`] is produced. Breaking this order is a programming error,
/// not a runtime-recoverable condition; implementations panic with a
/// [`ProtocolViolation`] payload so the breach is never mistaken for an
/// operational failure.
pub trait Stepwise: Send + 'static {
    /// Value each resolved suspension resumes the computation with.
    type Resume: Send + 'static;
    /// Final settlement value.
    type Output: Send + 'static;
    /// Failure type, both injectable at suspension points and terminal.
    type Error: Send + 'static;

    /// Produce the first step. Only ever called once, before any resume.
    fn advance(&mut self) -> Step<Self::Resume, Self::Output, Self::Error>;

    /// Resume after the outstanding suspension's operation succeeded.
    fn resume_with_value(
        &mut self,
        value: Self::Resume,
    ) -> Step<Self::Resume, Self::Output, Self::Error>;

    /// Resume after the outstanding suspension's operation failed.
    ///
    /// The failure is injected at the exact point the computation suspended;
    /// its own local error handling may intercept it and steer the run, or
    /// let it propagate outward as the failing settlement.
    fn resume_with_failure(
        &mut self,
        failure: Self::Error,
    ) -> Step<Self::Resume, Self::Output, Self::Error>;
}

/// An internal contract breach of the step protocol.
///
/// Never expected at runtime: a violation is a defect in the code driving or
/// implementing a computation, distinct from an operational failure. Raising
/// one aborts the run loudly instead of producing a failed settlement.
///
/// Taking computations by value already makes the cross-run breaches
/// (two drivers sharing one computation, reuse after settlement)
/// unrepresentable; only intra-run ordering is checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// A resume was issued before the computation was ever advanced.
    ResumeBeforeStart,
    /// A resume was issued after the computation had already settled.
    ResumeAfterSettlement,
    /// The computation was advanced again after its first step.
    AdvanceAfterStart,
    /// A continuation handed back a computation that was already mid-run.
    ScriptReused,
}

impl ProtocolViolation {
    /// Abort the current run with this violation as the panic payload.
    ///
    /// A [`DriverSession`](crate::coro::DriverSession) recognises the payload
    /// and re-raises it instead of downgrading it to a failed settlement.
    ///
    /// # Panics
    ///
    /// Always; that is the point.
    pub fn raise(self) -> ! {
        panic_any(self)
    }
}

impl Display for ProtocolViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResumeBeforeStart => {
                f.write_str("stepwise computation resumed before it was advanced")
            }
            Self::ResumeAfterSettlement => {
                f.write_str("stepwise computation resumed after it settled")
            }
            Self::AdvanceAfterStart => {
                f.write_str("stepwise computation advanced twice")
            }
            Self::ScriptReused => {
                f.write_str("continuation returned a script that was already driven")
            }
        }
    }
}
