#![forbid(unsafe_code)]

//! `percolate` — a coroutine trampoline for stepwise asynchronous
//! computations, plus the `SQLite`-backed ticket store that consumes it.
//!
//! The [`coro`] module is the core: a computation that suspends on pending
//! asynchronous operations is driven to a single eventual outcome, with
//! asynchronous failures injected back into the computation's own recovery
//! logic. The [`persistence`] layer is the engine's reference consumer —
//! every repository method is a fresh stepwise computation run through the
//! driver.

pub mod config;
pub mod coro;
pub mod errors;
pub mod models;
pub mod persistence;

pub use config::StoreConfig;
pub use errors::{AppError, Result};
