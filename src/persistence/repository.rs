//! Repository capability set shared by every entity store.
//!
//! One implementation per entity, no inheritance. Implementations build a
//! fresh stepwise computation per call and run it through the coroutine
//! driver; callers just await the returned future and need not know the
//! driver exists.

use std::any::type_name;
use std::future::Future;
use std::pin::Pin;

use crate::{AppError, Result};

/// One eventual repository outcome.
pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The capability set `{create, update, delete, find, find_one}`.
pub trait Repository: Send + Sync {
    /// Entity this repository stores.
    type Entity: Send + 'static;
    /// Selection criteria accepted by [`find`](Repository::find).
    type Filter: Send + 'static;

    /// Insert a new record, returning it as stored.
    fn create(&self, item: Self::Entity) -> RepoFuture<'_, Self::Entity>;

    /// Replace an existing record, returning it as stored.
    fn update(&self, id: &str, item: Self::Entity) -> RepoFuture<'_, Self::Entity>;

    /// Soft-delete a record. Repositories for reference data leave this
    /// unimplemented and settle with `AppError::Unsupported`.
    fn delete(&self, _id: &str) -> RepoFuture<'_, ()> {
        let capability = format!("{}.delete", type_name::<Self::Entity>());
        Box::pin(async move { Err(AppError::Unsupported(capability)) })
    }

    /// List records matching the filter.
    fn find(&self, filter: Self::Filter) -> RepoFuture<'_, Vec<Self::Entity>>;

    /// Retrieve a single record by identifier; missing records are an
    /// operational `AppError::NotFound` failure, never a panic.
    fn find_one(&self, id: &str) -> RepoFuture<'_, Self::Entity>;
}
