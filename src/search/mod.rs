//! Thread search: the boundary to the mail provider.
//!
//! `ThreadSource` is the provider capability (search + detail fetch);
//! `ThreadSearch` drives it: one search call, one detail fetch per summary,
//! each thread assembled and cleaned, the provider's page token passed back
//! untouched.

pub mod client;
pub mod query;

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::cleaning::BodyCleaner;
use crate::error::SourceError;
use crate::gmail::{RawThread, Thread, ThreadPage, ThreadsResult};

pub use client::GmailClient;
pub use query::ThreadQuery;

/// Parameters of one provider search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Opaque provider query string.
    pub query: String,
    pub label_ids: Vec<String>,
    pub page_token: Option<String>,
    pub page_size: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            label_ids: Vec::new(),
            page_token: None,
            page_size: 10,
        }
    }

    pub fn with_labels(mut self, label_ids: Vec<String>) -> Self {
        self.label_ids = label_ids;
        self
    }

    pub fn with_page_token(mut self, token: Option<String>) -> Self {
        self.page_token = token;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// A mail provider that can list and fetch threads.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    /// One page of thread summaries matching the request.
    async fn search(&self, request: &SearchRequest) -> Result<ThreadPage, SourceError>;

    /// Full detail of a single thread.
    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, SourceError>;
}

/// Searches a source and returns cleaned threads.
pub struct ThreadSearch {
    source: Arc<dyn ThreadSource>,
    cleaner: BodyCleaner,
    max_concurrent_fetches: usize,
}

impl ThreadSearch {
    pub fn new(source: Arc<dyn ThreadSource>, cleaner: BodyCleaner) -> Self {
        Self {
            source,
            cleaner,
            max_concurrent_fetches: 1,
        }
    }

    /// Allow up to `n` detail fetches in flight. Result order still follows
    /// the search page.
    pub fn with_max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n.max(1);
        self
    }

    /// Run one search page. Any boundary failure aborts the whole call.
    pub async fn search(&self, request: &SearchRequest) -> Result<ThreadsResult, SourceError> {
        let page = self.source.search(request).await?;
        debug!(
            query = %request.query,
            summaries = page.threads.len(),
            has_next_page = page.next_page_token.is_some(),
            "Thread search page received"
        );

        let ids: Vec<String> = page.threads.into_iter().map(|s| s.id).collect();

        // `buffered` yields in input order regardless of completion order.
        let threads: Vec<Thread> = stream::iter(ids)
            .map(|id| async move { self.fetch(&id).await })
            .buffered(self.max_concurrent_fetches)
            .try_collect()
            .await?;

        info!(
            query = %request.query,
            threads = threads.len(),
            "Thread search complete"
        );

        Ok(ThreadsResult {
            threads,
            next_page_token: page.next_page_token,
        })
    }

    async fn fetch(&self, thread_id: &str) -> Result<Thread, SourceError> {
        let raw = self.source.get_thread(thread_id).await?;
        Ok(Thread::from_raw(&raw, &self.cleaner))
    }
}
