//! Miniflux API data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Unread,
    Read,
    Removed,
}

impl EntryStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feed item as returned by Miniflux
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,

    #[serde(default)]
    pub user_id: i64,

    #[serde(default)]
    pub feed_id: i64,

    pub status: EntryStatus,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub starred: bool,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Response of the entry listing endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryResultSet {
    /// Number of entries matching the filter on the server
    #[serde(default)]
    pub total: u64,

    /// Entries included in this page
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Authenticated user, as returned by `/v1/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,

    #[serde(default)]
    pub is_admin: bool,
}

/// Query descriptor for listing entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub status: Option<EntryStatus>,
    pub limit: Option<u32>,
    pub order: Option<String>,
    pub direction: Option<String>,
}

impl Filter {
    /// Filter selecting unread entries
    pub fn unread() -> Self {
        Self {
            status: Some(EntryStatus::Unread),
            ..Default::default()
        }
    }

    /// Limit the number of entries returned
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort by `order` in `direction` ("asc" or "desc")
    pub fn sorted_by(mut self, order: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self.direction = Some(direction.into());
        self
    }

    /// Query string pairs for the fields that are set
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(order) = &self.order {
            query.push(("order", order.clone()));
        }
        if let Some(direction) = &self.direction {
            query.push(("direction", direction.clone()));
        }

        query
    }
}

/// Body of the bulk status update
#[derive(Debug, Serialize)]
pub(crate) struct UpdateEntriesRequest<'a> {
    pub entry_ids: &'a [i64],
    pub status: EntryStatus,
}

/// Error body returned by Miniflux on failures
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error_message: String,
}
