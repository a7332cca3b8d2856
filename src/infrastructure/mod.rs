//! Infrastructure layer - external concerns

pub mod cache;
pub mod crypto;
pub mod storage;

pub use cache::TtlCache;
pub use crypto::{create_token, verify_token, Claims, JwtConfig};
pub use storage::{FileLock, JsonFileStore, JsonRepositoryProvider, LockGuard, LockOptions};
