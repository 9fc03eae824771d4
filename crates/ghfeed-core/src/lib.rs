//! Event normalization, ordering and aggregation for activity feeds

mod aggregate;
mod config;
mod error;
mod normalize;
mod ordering;
mod types;

pub use aggregate::{aggregate, Category, CategoryCounts};
pub use config::{Config, ConfigError};
pub use error::FetchError;
pub use normalize::normalize;
pub use ordering::{ParseSortOrderError, SortOrder};
pub use types::{EventKind, EventRecord, Timestamp, MISSING};
