//! Pagination types
//!
//! Envelope and progress tracking for page-numbered endpoints.

use serde::Deserialize;
use serde_json::Value;

/// One page of a paged response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    /// Page index the server answered for
    #[serde(default)]
    pub page: u32,
    /// Page size the server applied
    #[serde(default)]
    pub page_size: u32,
    /// Total number of records across all pages
    pub total_records: u64,
    /// Records on this page, in server order
    #[serde(default)]
    pub records: Vec<Value>,
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request this page next
    Continue { page: u32 },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// Page to request next (1-based)
    pub page: u32,
    /// Records accumulated so far
    pub total_fetched: u64,
    /// Total reported by the most recent page
    pub total_records: Option<u64>,
    /// Is pagination complete?
    pub done: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            total_fetched: 0,
            total_records: None,
            done: false,
        }
    }
}

impl PaginationState {
    /// Create a new pagination state starting at page 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a received page and decide what comes next.
    ///
    /// Stops once the accumulated count reaches the reported total, or on an
    /// empty page.
    pub fn advance(&mut self, records_count: usize, total_records: u64) -> NextPage {
        self.total_fetched += records_count as u64;
        self.total_records = Some(total_records);

        if self.total_fetched >= total_records || records_count == 0 {
            self.done = true;
            return NextPage::Done;
        }

        self.page += 1;
        NextPage::Continue { page: self.page }
    }

    /// Pagination ended before the reported total was reached
    pub fn is_short(&self) -> bool {
        self.done
            && self
                .total_records
                .is_some_and(|total| self.total_fetched < total)
    }
}
