//! Catalog counters shown in the library header

use serde::Serialize;

/// Summary counts over the catalog, relative to the active user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total: usize,
    pub available: usize,
    pub checked_out: usize,
    /// Entries the active user authored
    pub authored_by_me: usize,
    /// Entries the active user is currently reading
    pub reading_now: usize,
    /// Checkout events across every entry
    pub total_reads: usize,
}
