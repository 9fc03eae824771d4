//! Two-tier (memory + disk) TTL cache for normalized activity feeds

mod clock;
mod entry;
mod io;
mod paths;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{read_entry, write_entry, CacheEntry, CacheError};
pub use io::{atomic_write, atomic_write_with, temp_path};
pub use paths::{sanitize_key, Paths, CACHE_DIR_ENV};
pub use store::{CacheStore, MemoryTier, Source};
