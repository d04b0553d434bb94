//! Disk-backed result cache.
//!
//! A keyed, time-bounded, content-addressed store:
//!
//! - One sub-directory per origin label (the key's host)
//! - One `<sha256-hex-of-key>.json` file per entry
//! - Per-entry TTL, checked against file mtime and the embedded timestamp
//! - Lazy eviction on read, plus an explicit sweep for maintenance

pub mod entry;
pub mod hash;
pub mod store;

pub use entry::{CacheEntry, Lookup};
pub use hash::{INVALID_ORIGIN, entry_file_name, hash_key, origin_label};
pub use store::{DEFAULT_TTL, DiskCache};
