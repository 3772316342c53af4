//! HTTP adapter for the remote quote endpoint.
//!
//! The endpoint speaks the JSONPlaceholder posts shape: fetched items carry
//! `{id, title, body}` and pushes answer with the assigned `{id}`. Titles
//! map to categories and bodies to quote text.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DEFAULT_CATEGORY, Quote};
use crate::util::{compact_text, is_http_url, normalize_text_option, unix_timestamp_ms};

/// Endpoint used when no remote URL is configured
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Number of items requested per fetch
pub const FETCH_LIMIT: usize = 15;

/// Per-request timeout in seconds
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Placeholder author id the endpoint expects on pushed items
const PUSH_USER_ID: i64 = 1;

/// A quote as received from the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuote {
    /// Remote identity, unique per endpoint
    pub server_id: String,
    /// Quote text, already trimmed and non-empty
    pub text: String,
    /// Category, defaulted when the remote title is blank
    pub category: String,
    /// When this snapshot was taken, Unix milliseconds
    pub server_stamp: i64,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {0}")]
    Api(String),
    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// HTTP client bound to one remote endpoint
#[derive(Debug, Clone)]
pub struct RemoteClient {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteClient {
    pub fn new(endpoint: impl Into<String>) -> RemoteResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }

    /// Endpoint this client talks to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the newest batch of quotes from the endpoint.
    ///
    /// Items without an id or with an empty body are dropped silently.
    pub async fn fetch_quotes(&self) -> RemoteResult<Vec<RemoteQuote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("_limit", FETCH_LIMIT)])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(parse_api_error(status, &body)));
        }

        let body = response.text().await?;
        parse_remote_payload(&body, unix_timestamp_ms())
    }

    /// Push one local quote to the endpoint.
    ///
    /// Returns the server id assigned by the endpoint, if the response
    /// carried one.
    pub async fn push_quote(&self, quote: &Quote) -> RemoteResult<Option<String>> {
        let request = PushQuoteRequest {
            title: &quote.category,
            body: &quote.text,
            user_id: PUSH_USER_ID,
            client_updated_at: quote.updated_at,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(parse_api_error(status, &body)));
        }

        let body = response.text().await?;
        parse_push_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RemoteItem {
    id: Option<serde_json::Value>,
    title: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushQuoteRequest<'a> {
    title: &'a str,
    body: &'a str,
    user_id: i64,
    client_updated_at: i64,
}

#[derive(Debug, Deserialize)]
struct PushQuoteResponse {
    id: Option<serde_json::Value>,
}

/// Parse a fetched batch into remote quotes. Public for testability.
pub fn parse_remote_payload(payload: &str, server_stamp: i64) -> RemoteResult<Vec<RemoteQuote>> {
    let items: Vec<RemoteItem> = serde_json::from_str(payload)
        .map_err(|e| RemoteError::InvalidPayload(format!("expected a JSON array: {e}")))?;

    let quotes = items
        .into_iter()
        .filter_map(|item| {
            let server_id = item.id.and_then(value_to_id)?;
            let text = normalize_text_option(item.body)?;
            let category = item
                .title
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

            Some(RemoteQuote {
                server_id,
                text,
                category,
                server_stamp,
            })
        })
        .collect();

    Ok(quotes)
}

/// Parse a push response into the assigned server id. Public for testability.
pub fn parse_push_response(payload: &str) -> RemoteResult<Option<String>> {
    let response: PushQuoteResponse = serde_json::from_str(payload)
        .map_err(|e| RemoteError::InvalidPayload(format!("expected a JSON object: {e}")))?;

    Ok(response.id.and_then(value_to_id))
}

/// Remote ids arrive as numbers or strings depending on the endpoint
fn value_to_id(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::String(id) => {
            let id = id.trim().to_string();
            (!id.is_empty()).then_some(id)
        }
        _ => None,
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> RemoteResult<String> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        RemoteError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(RemoteError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
