//! File-backed persistence
//!
//! One JSON array per entity under the data directory. Every mutation holds
//! that file's advisory lock for the whole read-modify-write.

mod file_lock;
mod json_store;
pub mod repositories;

pub use file_lock::{FileLock, LockGuard, LockMetadata, LockOptions};
pub use json_store::JsonFileStore;
pub use repositories::JsonRepositoryProvider;
