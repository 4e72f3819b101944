//! Gmail REST thread source.
//!
//! Takes an access token from the caller; obtaining and refreshing it is
//! someone else's job. No retries.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::DEFAULT_API_BASE_URL;
use crate::error::SourceError;
use crate::gmail::{RawThread, ThreadPage};
use crate::search::{SearchRequest, ThreadSource};

/// Response bodies longer than this are cut in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Thread source backed by the Gmail REST API.
pub struct GmailClient {
    client: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl GmailClient {
    pub fn new(access_token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn threads_url(&self) -> String {
        format!("{}/users/me/threads", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| SourceError::RequestFailed {
            endpoint: endpoint.to_string(),
            reason: format!("Failed to read body: {e}"),
        })?;

        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| SourceError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Query parameters for `threads.list`. Labels repeat the `labelIds` key.
pub fn search_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", request.query.clone()),
        ("maxResults", request.page_size.to_string()),
    ];
    params.extend(request.label_ids.iter().map(|l| ("labelIds", l.clone())));
    if let Some(token) = &request.page_token {
        params.push(("pageToken", token.clone()));
    }
    params
}

#[async_trait]
impl ThreadSource for GmailClient {
    async fn search(&self, request: &SearchRequest) -> Result<ThreadPage, SourceError> {
        let params = search_params(request);
        self.get_json("threads.list", &self.threads_url(), &params)
            .await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<RawThread, SourceError> {
        let url = format!("{}/{}", self.threads_url(), thread_id);
        let params = [("format", "full".to_string())];
        match self.get_json("threads.get", &url, &params).await {
            Err(SourceError::Status { status: 404, .. }) => Err(SourceError::ThreadNotFound {
                id: thread_id.to_string(),
            }),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_include_labels_and_token() {
        let request = SearchRequest::new("flight after:2024-01-01")
            .with_labels(vec!["INBOX".into(), "IMPORTANT".into()])
            .with_page_token(Some("tok".into()))
            .with_page_size(5);
        let params = search_params(&request);
        assert_eq!(
            params,
            vec![
                ("q", "flight after:2024-01-01".to_string()),
                ("maxResults", "5".to_string()),
                ("labelIds", "INBOX".to_string()),
                ("labelIds", "IMPORTANT".to_string()),
                ("pageToken", "tok".to_string()),
            ]
        );
    }

    #[test]
    fn first_page_has_no_token() {
        let params = search_params(&SearchRequest::new("x"));
        assert!(params.iter().all(|(k, _)| *k != "pageToken"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GmailClient::new(SecretString::from("t")).with_base_url("http://localhost:1/v1/");
        assert_eq!(client.threads_url(), "http://localhost:1/v1/users/me/threads");
    }
}
