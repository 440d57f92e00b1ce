//! The coroutine engine: a step protocol and the trampoline that drives it.
//!
//! A [`Stepwise`] computation pauses at well-defined suspension points, each
//! wrapping one pending asynchronous operation, and is resumed with either
//! the operation's value or its failure. [`drive`] runs one computation to
//! its single [`Settlement`]; [`DriverSession`] does the same detached from
//! the caller. From the computation's point of view an injected asynchronous
//! failure is indistinguishable from one raised at that point in its own
//! logic, so ordinary local error handling works against remote failures.
//!
//! Computations are single-use and strictly sequential: one driver per
//! computation, at most one outstanding suspension at a time, steps executed
//! in the order yielded. Independent computations may be driven concurrently
//! by independent sessions; they share nothing through the engine. Callers
//! act as factories — construct a fresh computation per invocation.

pub mod driver;
pub mod script;
pub mod step;

pub use driver::{drive, DriveError, DriverSession};
pub use script::Script;
pub use step::{ProtocolViolation, Settlement, Step, Stepwise, Suspension};
