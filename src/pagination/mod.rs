//! Pagination module
//!
//! Reconciles page-numbered endpoints (`page`, `pageSize`, `totalRecords`)
//! into a single ordered record list.
//!
//! # Overview
//!
//! `PageReconciler::collect` requests page 1, reads the reported total and
//! keeps requesting the next page index until the accumulated count reaches
//! it. A failure on any page fails the whole collection; partial results are
//! never returned.

mod reconciler;
mod types;

pub use reconciler::PageReconciler;
pub use types::{NextPage, PageEnvelope, PaginationState};
