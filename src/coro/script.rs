//! Continuation-passing builder for stepwise computations.
//!
//! Most callers do not hand-roll a [`Stepwise`] state machine: a [`Script`]
//! chains suspensions with `FnOnce` continuations instead. Each continuation
//! receives the `Result` of the operation it suspended on — the `Err` arm is
//! the computation's local catch block, where an injected operational
//! failure can be recovered mid-run.
//!
//! ```ignore
//! let script = Script::suspend(fetch_rows(pool, id), |fetched| match fetched {
//!     Ok(rows) => Script::done(rows.len()),
//!     Err(err) => Script::fail(err),
//! });
//! let count = drive(script).await?;
//! ```

use std::future::Future;
use std::mem;

use super::step::{ProtocolViolation, Settlement, Step, Stepwise, Suspension};

type Continuation<V, T, E> = Box<dyn FnOnce(Result<V, E>) -> Script<V, T, E> + Send>;

enum Link<V, T, E> {
    Suspend(Suspension<V, E>, Continuation<V, T, E>),
    Finish(Settlement<T, E>),
}

enum Slot<V, T, E> {
    /// Built but not yet driven.
    Fresh(Link<V, T, E>),
    /// Suspension handed out; holding the continuation for the resume.
    Waiting(Continuation<V, T, E>),
    Done,
}

/// A stepwise computation assembled from suspension/continuation links.
///
/// Single-use, like every stepwise computation: construct a fresh script per
/// invocation and hand it to a driver by value.
pub struct Script<V, T, E> {
    slot: Slot<V, T, E>,
}

impl<V, T, E> Script<V, T, E>
where
    V: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Suspend on `operation`, then continue as `then` directs.
    ///
    /// `then` receives the operation's outcome: `Ok` with its value, or
    /// `Err` with the injected failure. Either arm may suspend again, settle
    /// with [`Script::done`], or settle with [`Script::fail`].
    #[must_use]
    pub fn suspend<F, K>(operation: F, then: K) -> Self
    where
        F: Future<Output = Result<V, E>> + Send + 'static,
        K: FnOnce(Result<V, E>) -> Script<V, T, E> + Send + 'static,
    {
        Self {
            slot: Slot::Fresh(Link::Suspend(Suspension::new(operation), Box::new(then))),
        }
    }

    /// Settle with a final value without suspending further.
    #[must_use]
    pub fn done(value: T) -> Self {
        Self {
            slot: Slot::Fresh(Link::Finish(Settlement::Value(value))),
        }
    }

    /// Settle with a final failure without suspending further.
    #[must_use]
    pub fn fail(failure: E) -> Self {
        Self {
            slot: Slot::Fresh(Link::Finish(Settlement::Failure(failure))),
        }
    }

    fn emit(&mut self, link: Link<V, T, E>) -> Step<V, T, E> {
        match link {
            Link::Suspend(suspension, resume) => {
                self.slot = Slot::Waiting(resume);
                Step::Suspend(suspension)
            }
            Link::Finish(settlement) => {
                self.slot = Slot::Done;
                Step::Settle(settlement)
            }
        }
    }

    fn follow(&mut self, outcome: Result<V, E>) -> Step<V, T, E> {
        match mem::replace(&mut self.slot, Slot::Done) {
            Slot::Waiting(resume) => match resume(outcome).slot {
                Slot::Fresh(link) => self.emit(link),
                Slot::Waiting(_) | Slot::Done => ProtocolViolation::ScriptReused.raise(),
            },
            Slot::Fresh(_) => ProtocolViolation::ResumeBeforeStart.raise(),
            Slot::Done => ProtocolViolation::ResumeAfterSettlement.raise(),
        }
    }
}

impl<V, T, E> Stepwise for Script<V, T, E>
where
    V: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Resume = V;
    type Output = T;
    type Error = E;

    fn advance(&mut self) -> Step<V, T, E> {
        match mem::replace(&mut self.slot, Slot::Done) {
            Slot::Fresh(link) => self.emit(link),
            Slot::Waiting(_) | Slot::Done => ProtocolViolation::AdvanceAfterStart.raise(),
        }
    }

    fn resume_with_value(&mut self, value: V) -> Step<V, T, E> {
        self.follow(Ok(value))
    }

    fn resume_with_failure(&mut self, failure: E) -> Step<V, T, E> {
        self.follow(Err(failure))
    }
}
