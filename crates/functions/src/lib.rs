//! Edge Functions client for the Hasad marketplace
//!
//! Invokes Supabase Edge Functions (`/functions/v1/{name}`) with a JSON body.

use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FunctionsError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Function error (status {status}): {message}")]
    FunctionError {
        status: u16,
        message: String,
        details: Option<Value>,
    },
}

pub type Result<T> = std::result::Result<T, FunctionsError>;

/// Error body conventionally returned by edge functions
#[derive(Debug, Deserialize)]
struct FunctionErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Response of a successful invocation
#[derive(Debug, Clone)]
pub struct FunctionResponse<T> {
    pub data: T,
    pub status: u16,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionOptions {
    pub headers: Option<HashMap<String, String>>,
}

impl FunctionOptions {
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }
}

/// Edge Functions client
pub struct FunctionsClient {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    http_client: Client,
}

impl FunctionsClient {
    pub fn new(supabase_url: &str, supabase_key: &str, http_client: Client) -> Self {
        Self {
            base_url: supabase_url.to_string(),
            api_key: supabase_key.to_string(),
            access_token: None,
            http_client,
        }
    }

    /// Invoke as a signed-in user instead of the anonymous key
    pub fn with_auth(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    /// Invoke an edge function and decode its JSON response
    pub async fn invoke<R: DeserializeOwned, T: Serialize>(
        &self,
        function_name: &str,
        body: Option<T>,
        options: Option<FunctionOptions>,
    ) -> Result<FunctionResponse<R>> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| FunctionsError::UrlError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("functions")
            .push("v1")
            .push(function_name);

        debug!("POST {}", url);

        let token = self.access_token.as_deref().unwrap_or(&self.api_key);
        let mut request = self
            .http_client
            .post(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", token));

        if let Some(headers) = options.unwrap_or_default().headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        if let Some(body_data) = body {
            request = request.json(&body_data);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_str().unwrap_or("").to_string()))
            .collect();

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(Self::function_error(status, error_text));
        }

        let data = response.json::<R>().await?;

        Ok(FunctionResponse {
            data,
            status,
            headers,
        })
    }

    fn function_error(status: u16, error_text: String) -> FunctionsError {
        match serde_json::from_str::<Value>(&error_text) {
            Ok(details) => {
                let message = serde_json::from_value::<FunctionErrorBody>(details.clone())
                    .ok()
                    .and_then(|body| body.message.or(body.error))
                    .unwrap_or_else(|| error_text.clone());
                FunctionsError::FunctionError {
                    status,
                    message,
                    details: Some(details),
                }
            }
            Err(_) => FunctionsError::FunctionError {
                status,
                message: error_text,
                details: None,
            },
        }
    }
}
