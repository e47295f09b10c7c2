//! Unread entry processing
//!
//! One pass fetches a single page of entries and, strictly in fetch order,
//! saves each one and then marks it as read. An entry failing either step
//! counts as one error and is not retried within the same pass.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::miniflux::{ApiError, EntryStatus, FeedApi, Filter};

/// Outcome of one processing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Entries both saved and marked as read
    pub processed: usize,

    /// Entries that failed at either step
    pub errors: usize,

    /// Entries fetched
    pub total: usize,
}

/// Saves and marks as read the entries selected by a filter
#[derive(Clone)]
pub struct EntryProcessor {
    api: Arc<dyn FeedApi>,
}

impl EntryProcessor {
    pub fn new(api: Arc<dyn FeedApi>) -> Self {
        Self { api }
    }

    /// Run one pass, folding a failed fetch into an empty result
    ///
    /// A failed fetch and an empty page both yield `(0, 0, 0)`; the failure
    /// is only visible in the logs. Use [`try_process`](Self::try_process)
    /// to tell them apart.
    pub async fn process(&self, filter: &Filter) -> ProcessResult {
        match self.try_process(filter).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching entries");
                ProcessResult::default()
            }
        }
    }

    /// Run one pass, returning an error if the entries cannot be fetched
    pub async fn try_process(&self, filter: &Filter) -> Result<ProcessResult, ApiError> {
        let result_set = self.api.entries(filter).await?;
        let entries = result_set.entries;

        let mut processed = 0;
        let mut errors = 0;

        for entry in &entries {
            tracing::info!(entry_id = entry.id, title = %entry.title, "Saving entry");

            if let Err(e) = self.api.save_entry(entry.id).await {
                tracing::warn!(entry_id = entry.id, error = %e, "Error saving entry");
                errors += 1;
                continue;
            }

            if let Err(e) = self.api.update_entries(&[entry.id], EntryStatus::Read).await {
                tracing::warn!(entry_id = entry.id, error = %e, "Error marking entry as read");
                errors += 1;
                continue;
            }

            processed += 1;
        }

        tracing::info!(processed, errors, total = entries.len(), "Processing complete");

        Ok(ProcessResult {
            processed,
            errors,
            total: entries.len(),
        })
    }
}
