//! Infrastructure layer - Store, alias and blob implementations

pub mod alias;
pub mod blob;
pub mod logging;
pub mod storage;

pub use alias::StoreAliasResolver;
pub use blob::{InMemoryBlobStore, LocalBlobStore};
pub use storage::{InMemoryStorage, PostgresStorage, StorageConfig, StorageFactory};
