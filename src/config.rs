//! Configuration types.
//!
//! Everything has a default; `from_env` overrides from `MAIL_DIGEST_*`
//! variables and rejects values that don't parse.

use std::str::FromStr;

use crate::cleaning::SignatureConfig;
use crate::error::ConfigError;

/// Default Gmail REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// Thread search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Threads requested per search page.
    pub page_size: u32,
    /// Thread detail fetches in flight at once (1 = sequential).
    pub max_concurrent_fetches: usize,
    /// Label ids every search is restricted to.
    pub label_ids: Vec<String>,
    /// Base URL of the provider API.
    pub api_base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_concurrent_fetches: 1,
            label_ids: Vec::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub signatures: SignatureConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let signatures = SignatureConfig {
            min_signature_lines: parse_var(
                &lookup,
                "MAIL_DIGEST_MIN_SIGNATURE_LINES",
                defaults.signatures.min_signature_lines,
            )?,
            min_messages_with_signature: parse_var(
                &lookup,
                "MAIL_DIGEST_MIN_MESSAGES_WITH_SIGNATURE",
                defaults.signatures.min_messages_with_signature,
            )?,
        };
        if signatures.min_signature_lines == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAIL_DIGEST_MIN_SIGNATURE_LINES".into(),
                message: "must be at least 1".into(),
            });
        }

        let page_size: u32 = parse_var(&lookup, "MAIL_DIGEST_PAGE_SIZE", defaults.search.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAIL_DIGEST_PAGE_SIZE".into(),
                message: "must be at least 1".into(),
            });
        }

        let max_concurrent_fetches = parse_var(
            &lookup,
            "MAIL_DIGEST_MAX_CONCURRENT_FETCHES",
            defaults.search.max_concurrent_fetches,
        )?
        .max(1);

        let label_ids: Vec<String> = lookup("MAIL_DIGEST_LABEL_IDS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let api_base_url = lookup("MAIL_DIGEST_API_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.search.api_base_url);

        Ok(Self {
            signatures,
            search: SearchConfig {
                page_size,
                max_concurrent_fetches,
                label_ids,
                api_base_url,
            },
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}
