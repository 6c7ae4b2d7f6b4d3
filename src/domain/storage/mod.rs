//! Storage domain - typed store gateway contract

mod entity;
mod filter;
mod repository;

pub use entity::{Database, StorageRecord, Table};
pub use filter::{Condition, Filters};
pub use repository::Storage;

#[cfg(test)]
pub use repository::mock;
