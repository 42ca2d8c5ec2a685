//! Page accumulation over a transport

use super::types::{NextPage, PageEnvelope, PaginationState};
use crate::error::{Error, Result};
use crate::http::{RequestConfig, Transport};
use crate::types::Method;
use serde_json::Value;
use tracing::debug;

/// Accumulates every page of a paged endpoint into one record list
pub struct PageReconciler<'a> {
    transport: &'a dyn Transport,
}

impl<'a> PageReconciler<'a> {
    /// Create a reconciler over a transport
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Fetch all pages of `endpoint`.
    ///
    /// `extra_params` are sent with every page alongside `page` and
    /// `pageSize`. Any failed, malformed or premature empty page fails the
    /// whole collection.
    pub async fn collect(
        &self,
        endpoint: &str,
        page_size: u32,
        extra_params: &[(&str, &str)],
    ) -> Result<Vec<Value>> {
        let page_size = page_size.max(1);
        let mut state = PaginationState::new();
        let mut records = Vec::new();

        loop {
            let page = state.page;
            let config = RequestConfig::new()
                .queries(extra_params.iter().copied())
                .query("page", page)
                .query("pageSize", page_size);

            let body = self
                .transport
                .fetch(Method::GET, endpoint, config)
                .await
                .map_err(|e| Error::pagination(endpoint, page, e.to_string()))?;
            let envelope: PageEnvelope = serde_json::from_value(body)
                .map_err(|e| Error::pagination(endpoint, page, format!("malformed page: {e}")))?;

            debug!(
                "{} page {}: {} records ({} of {} total)",
                endpoint,
                page,
                envelope.records.len(),
                state.total_fetched + envelope.records.len() as u64,
                envelope.total_records
            );

            let count = envelope.records.len();
            records.extend(envelope.records);

            if let NextPage::Done = state.advance(count, envelope.total_records) {
                break;
            }
        }

        if state.is_short() {
            return Err(Error::pagination(
                endpoint,
                state.page,
                format!(
                    "empty page before totalRecords reached ({} of {})",
                    state.total_fetched,
                    state.total_records.unwrap_or_default()
                ),
            ));
        }

        Ok(records)
    }
}

impl std::fmt::Debug for PageReconciler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageReconciler").finish_non_exhaustive()
    }
}
