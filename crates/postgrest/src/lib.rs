//! PostgREST client for the Hasad marketplace
//!
//! A small query builder over the Supabase REST endpoint (`/rest/v1/{table}`).
//! It covers what the marketplace core needs from a hosted table:
//!
//! - `select` with `eq` filters, ordering and limits
//! - `insert` / `update` / `delete` returning the affected rows
//! - bearer authentication and schema profile headers

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Error body returned by PostgREST on a failed request
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostgrestApiErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl fmt::Display for PostgrestApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(code) = &self.code {
            parts.push(format!("Code: {}", code));
        }
        if let Some(message) = &self.message {
            parts.push(format!("Message: {}", message));
        }
        if let Some(details) = &self.details {
            parts.push(format!("Details: {}", details));
        }
        if let Some(hint) = &self.hint {
            parts.push(format!("Hint: {}", hint));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Error, Debug)]
pub enum PostgrestError {
    #[error("API error: {details} (Status: {status})")]
    ApiError {
        details: PostgrestApiErrorDetails,
        status: StatusCode,
    },

    #[error("API error (unparsed): {message} (Status: {status})")]
    UnparsedApiError { message: String, status: StatusCode },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl PostgrestError {
    /// HTTP status of the failed request, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PostgrestError::ApiError { status, .. }
            | PostgrestError::UnparsedApiError { status, .. } => Some(*status),
            PostgrestError::NetworkError(e) => e.status(),
            _ => None,
        }
    }
}

/// Sort direction for `order`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Client for a single table
pub struct PostgrestClient {
    base_url: String,
    table: String,
    http_client: Client,
    headers: HeaderMap,
    query_params: HashMap<String, String>,
}

impl PostgrestClient {
    /// Create a client for `table` under `base_url`
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        http_client: Client,
    ) -> Result<Self, PostgrestError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(api_key)
            .map_err(|_| PostgrestError::InvalidParameters("Invalid API key".to_string()))?;
        headers.insert("apikey", api_key);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            http_client,
            headers,
            query_params: HashMap::new(),
        })
    }

    /// Add a request header
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, PostgrestError> {
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            PostgrestError::InvalidParameters(format!("Invalid header value: {}", value))
        })?;
        let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            PostgrestError::InvalidParameters(format!("Invalid header name: {}", key))
        })?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Authenticate as a signed-in user
    pub fn with_auth(self, token: &str) -> Result<Self, PostgrestError> {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    /// Target a schema other than `public` for both reads and writes
    pub fn with_schema(self, schema: &str) -> Result<Self, PostgrestError> {
        self.with_header("Accept-Profile", schema)?
            .with_header("Content-Profile", schema)
    }

    /// Columns to return
    pub fn select(mut self, columns: &str) -> Self {
        self.query_params
            .insert("select".to_string(), columns.to_string());
        self
    }

    /// Equality filter
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.query_params
            .insert(column.to_string(), format!("eq.{}", value));
        self
    }

    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        let order_str = match order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        self.query_params
            .insert("order".to_string(), format!("{}.{}", column, order_str));
        self
    }

    pub fn limit(mut self, count: i32) -> Self {
        self.query_params
            .insert("limit".to_string(), count.to_string());
        self
    }

    /// Fetch the matching rows
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, PostgrestError> {
        let url = self.build_url()?;
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| PostgrestError::DeserializationError(e.to_string()))
    }

    /// Insert rows, returning the stored representation
    pub async fn insert<T: Serialize>(&self, values: T) -> Result<Value, PostgrestError> {
        let url = self.build_url()?;
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .headers(self.representation_headers())
            .json(&values)
            .send()
            .await?;

        Self::representation(response).await
    }

    /// Update the rows matched by the filters
    pub async fn update<T: Serialize>(&self, values: T) -> Result<Value, PostgrestError> {
        self.require_filter("update")?;
        let url = self.build_url()?;
        debug!("PATCH {}", url);

        let response = self
            .http_client
            .patch(&url)
            .headers(self.representation_headers())
            .json(&values)
            .send()
            .await?;

        Self::representation(response).await
    }

    /// Delete the rows matched by the filters
    pub async fn delete(&self) -> Result<Value, PostgrestError> {
        self.require_filter("delete")?;
        let url = self.build_url()?;
        debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(&url)
            .headers(self.representation_headers())
            .send()
            .await?;

        Self::representation(response).await
    }

    fn build_url(&self) -> Result<String, PostgrestError> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, self.table))?;

        for (key, value) in &self.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url.to_string())
    }

    fn representation_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_static("return=representation"),
        );
        headers
    }

    // Unfiltered writes would touch every row the caller can see.
    fn require_filter(&self, operation: &str) -> Result<(), PostgrestError> {
        let filtered = self
            .query_params
            .keys()
            .any(|key| !matches!(key.as_str(), "select" | "order" | "limit"));
        if filtered {
            Ok(())
        } else {
            Err(PostgrestError::InvalidParameters(format!(
                "Refusing to {} {} without a filter",
                operation, self.table
            )))
        }
    }

    async fn check_status(response: Response) -> Result<Response, PostgrestError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        match serde_json::from_str::<PostgrestApiErrorDetails>(&error_text) {
            Ok(details) => Err(PostgrestError::ApiError { details, status }),
            Err(_) => Err(PostgrestError::UnparsedApiError {
                message: error_text,
                status,
            }),
        }
    }

    async fn representation(response: Response) -> Result<Value, PostgrestError> {
        let response = Self::check_status(response).await?;

        let body_text = response.text().await.map_err(|e| {
            PostgrestError::DeserializationError(format!("Failed to read response body: {}", e))
        })?;

        // 204 No Content
        if body_text.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(&body_text)
                .map_err(|e| PostgrestError::DeserializationError(e.to_string()))
        }
    }
}
