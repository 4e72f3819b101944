//! `search_message_threads`: lets an agent answer questions from mail.
//!
//! Keywords go to the provider as-is; the tool only adds the default
//! two-year window and an optional sender filter, then returns the cleaned
//! threads as JSON.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::context::ToolContext;
use crate::search::{SearchRequest, ThreadQuery, ThreadSearch};
use crate::tools::tool::{Tool, ToolError, ToolOutput, require_str};

/// Tool that searches message threads and returns them cleaned.
pub struct SearchThreadsTool {
    search: Arc<ThreadSearch>,
    label_ids: Vec<String>,
    page_size: u32,
}

impl SearchThreadsTool {
    pub fn new(search: Arc<ThreadSearch>, config: &SearchConfig) -> Self {
        Self {
            search,
            label_ids: config.label_ids.clone(),
            page_size: config.page_size,
        }
    }

    /// Build the provider request for a call.
    fn request(
        &self,
        params: &serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<SearchRequest, ToolError> {
        let keywords = require_str(params, "keywords")?;
        let sender = params.get("sender").and_then(|v| v.as_str());
        let include_old = params
            .get("include_threads_older_than_2y")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let page_token = params
            .get("page_token")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let mut query = ThreadQuery::new(keywords);
        if !include_old {
            query = query.recent(&ctx.now);
        }
        if let Some(sender) = sender {
            query = query.from_sender(sender);
        }

        Ok(SearchRequest::new(query.to_string())
            .with_labels(self.label_ids.clone())
            .with_page_token(page_token)
            .with_page_size(self.page_size))
    }
}

#[async_trait]
impl Tool for SearchThreadsTool {
    fn name(&self) -> &str {
        "search_message_threads"
    }

    fn description(&self) -> &str {
        "Search the user's email threads and return them cleaned: messages in \
         chronological order with quoted replies, repeated signatures and HTML \
         removed. Keywords use provider syntax: space = all terms, OR = either, \
         parentheses group. Strip punctuation and prefer a few broad terms."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "Search keywords, e.g. `(trip OR itinerary OR flight) boston`"
                },
                "sender": {
                    "type": "string",
                    "description": "Sender filter, e.g. `\"Bob Jones\"`, `amazon.com`, `jim@abc.com`"
                },
                "include_threads_older_than_2y": {
                    "type": "boolean",
                    "description": "Look up historical records older than two years (default: false)"
                },
                "page_token": {
                    "type": "string",
                    "description": "next_page_token from a previous call, to fetch the following page"
                }
            },
            "required": ["keywords"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let request = self.request(&params, ctx)?;

        tracing::info!(user = %ctx.user_id, query = %request.query, "Searching message threads");

        let result = self
            .search
            .search(&request)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Thread search failed: {e}")))?;

        let output = serde_json::to_value(&result)
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to serialize threads: {e}")))?;

        Ok(ToolOutput::success(output, start.elapsed()))
    }
}
