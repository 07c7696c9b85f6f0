//! Data models for the dream library

pub mod entry;
pub mod filter;
pub mod seed;
pub mod stats;

// Re-export commonly used types
pub use entry::{CheckoutRecord, DisplayTag, Entry, EntryDraft, EntryId, EntryRecord};
pub use filter::ListFilter;
pub use stats::LibraryStats;

/// Entries keyed by id, in display order (newest first)
pub type Catalog = indexmap::IndexMap<EntryId, Entry>;
