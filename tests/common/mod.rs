//! Common test utilities

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fluxsave::miniflux::{
    ApiError, ApiResult, Entry, EntryResultSet, EntryStatus, FeedApi, Filter, User,
};

/// Create an unread entry with default values
pub fn unread_entry(id: i64) -> Entry {
    Entry {
        id,
        user_id: 1,
        feed_id: 1,
        status: EntryStatus::Unread,
        title: format!("Entry {id}"),
        url: format!("https://blog.example.com/posts/{id}"),
        starred: false,
        published_at: None,
    }
}

/// In-memory [`FeedApi`] with scripted failures and delays
#[derive(Default)]
pub struct FakeApi {
    pub entry_ids: Vec<i64>,
    pub fail_save: HashSet<i64>,
    pub me_error: bool,
    pub me_delay: Option<Duration>,
    pub entries_delay: Option<Duration>,
    pub save_delay: Option<Duration>,
    pub mark_read_delay: Option<Duration>,
    pub entries_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub mark_read_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn with_entries(ids: &[i64]) -> Self {
        Self {
            entry_ids: ids.to_vec(),
            ..Default::default()
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn entries_calls(&self) -> usize {
        self.entries_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn mark_read_calls(&self) -> usize {
        self.mark_read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedApi for FakeApi {
    async fn entries(&self, _filter: &Filter) -> ApiResult<EntryResultSet> {
        self.entries_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.entries_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(EntryResultSet {
            total: self.entry_ids.len() as u64,
            entries: self.entry_ids.iter().map(|&id| unread_entry(id)).collect(),
        })
    }

    async fn save_entry(&self, entry_id: i64) -> ApiResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_save.contains(&entry_id) {
            return Err(ApiError::Server {
                status: 500,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn update_entries(&self, entry_ids: &[i64], _status: EntryStatus) -> ApiResult<()> {
        self.mark_read_calls
            .fetch_add(entry_ids.len(), Ordering::SeqCst);
        if let Some(delay) = self.mark_read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn me(&self) -> ApiResult<User> {
        if let Some(delay) = self.me_delay {
            tokio::time::sleep(delay).await;
        }
        if self.me_error {
            return Err(ApiError::Unauthorized);
        }
        Ok(User {
            id: 1,
            username: "admin".to_string(),
            is_admin: true,
        })
    }
}
