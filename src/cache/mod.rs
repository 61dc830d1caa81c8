//! # In-Process Cache
//!
//! Read-through / write-invalidate cache sitting in front of the persistence
//! layer. Entries live for a fixed TTL and the store is bounded by a maximum
//! size, evicting in insertion order when full.
//!
//! ## Design Decisions
//!
//! - **Single process**: each process owns its cache; nothing is shared
//!   between replicas.
//! - **Lazy expiry**: expired entries are purged by the lookup that finds them,
//!   there is no background sweeper.
//! - **Prefix invalidation**: services namespace their keys (`funds:`,
//!   `investors:`, `investments:`) and drop a whole namespace after a write.

pub mod ttl_cache;

pub use ttl_cache::{CacheStats, TtlCache};
