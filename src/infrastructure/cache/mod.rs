//! In-process caches for derived read views

mod ttl_cache;

pub use ttl_cache::TtlCache;
