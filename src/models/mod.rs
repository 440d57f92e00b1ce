//! Domain model module declarations.

pub mod priority;
pub mod ticket;
