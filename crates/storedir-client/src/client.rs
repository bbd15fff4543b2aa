//! HTTP client for the store directory REST API.
//!
//! Wraps `reqwest` and normalizes every outcome into an [`ApiResponse`]:
//! transport failures, non-2xx statuses and malformed bodies are logged and
//! returned as failed responses, never as `Err`.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use storedir_core::{AppConfig, Category, FilterState, Store};

use crate::error::ClientError;
use crate::params::store_query;
use crate::types::{body_message, extract_records, ApiResponse};

const STORES_PATH: &str = "stores";
const CATEGORIES_PATH: &str = "categories";

/// Client for the store directory REST API.
///
/// Use [`StoreApiClient::new`] with the application config or
/// [`StoreApiClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct StoreApiClient {
    client: Client,
    base_url: Url,
}

impl StoreApiClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured API URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Fetches one page of stores matching the search text and filters.
    pub async fn fetch_stores(
        &self,
        page: u32,
        search_query: &str,
        filters: &FilterState,
    ) -> ApiResponse<Store> {
        let params = store_query(page, search_query, filters);
        let url = self.endpoint(STORES_PATH, &params);
        tracing::debug!(page, %url, "fetching stores");
        self.get_list(url).await
    }

    /// Fetches the full category list.
    pub async fn fetch_categories(&self) -> ApiResponse<Category> {
        let url = self.endpoint(CATEGORIES_PATH, &[]);
        tracing::debug!(%url, "fetching categories");
        self.get_list(url).await
    }

    /// Builds an endpoint URL with percent-encoded query parameters.
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        // The base always ends with '/', so this only appends a segment.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> ApiResponse<T> {
        match self.request_list(&url).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%url, status = err.status(), error = %err, "store API request failed");
                ApiResponse::from_error(&err)
            }
        }
    }

    /// Sends a GET request and decodes a record list from the body.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not JSON or a record
    ///   does not match `T`.
    /// - [`ClientError::UnexpectedShape`] if the body is neither a list nor
    ///   an object carrying `data`.
    async fn request_list<T: DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .as_ref()
                .and_then(body_message);
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        let status = status.as_u16();
        let value: serde_json::Value = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: url.to_string(),
                status,
                source: e,
            })?
        };

        let message = body_message(&value);
        let records = extract_records(value).ok_or_else(|| ClientError::UnexpectedShape {
            context: url.to_string(),
            status,
        })?;
        let data = serde_json::from_value::<Vec<T>>(serde_json::Value::Array(records)).map_err(
            |e| ClientError::Deserialize {
                context: url.to_string(),
                status,
                source: e,
            },
        )?;

        tracing::debug!(%url, count = data.len(), "store API request succeeded");
        Ok(ApiResponse::ok(status, data, message))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
