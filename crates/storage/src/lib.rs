//! Storage client for the Hasad marketplace
//!
//! Uploads objects into a Supabase Storage bucket and builds the public URL
//! they are served from.

use bytes::Bytes;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Invalid object path: {0}")]
    InvalidPath(String),
}

/// Upload options
#[derive(Debug, Clone, Serialize, Default)]
pub struct FileOptions {
    pub cache_control: Option<String>,
    pub content_type: Option<String>,
    pub upsert: Option<bool>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache-Control max age in seconds, as a string (`"3600"`)
    pub fn with_cache_control(mut self, cache_control: &str) -> Self {
        self.cache_control = Some(cache_control.to_string());
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Overwrite an existing object at the same path
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }
}

/// Response body of a successful upload
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadedObject {
    /// `{bucket}/{path}`
    #[serde(rename = "Key")]
    pub key: String,

    #[serde(rename = "Id", default)]
    pub id: Option<String>,
}

/// Client for Supabase Storage
pub struct StorageClient {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    http_client: Client,
}

/// Client for a single bucket
pub struct StorageBucketClient<'a> {
    parent: &'a StorageClient,
    bucket_id: String,
}

impl StorageClient {
    pub fn new(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
            http_client,
        }
    }

    /// Act as a signed-in user instead of the anonymous key
    pub fn with_auth(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn from<'a>(&'a self, bucket_id: &str) -> StorageBucketClient<'a> {
        StorageBucketClient {
            parent: self,
            bucket_id: bucket_id.to_string(),
        }
    }

    fn bearer(&self) -> String {
        format!(
            "Bearer {}",
            self.access_token.as_deref().unwrap_or(&self.api_key)
        )
    }
}

impl<'a> StorageBucketClient<'a> {
    /// Upload `data` to `path` inside the bucket
    pub async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: Option<FileOptions>,
    ) -> Result<UploadedObject> {
        let path = path.trim_start_matches('/');
        let file_name = path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StorageError::InvalidPath(path.to_string()))?
            .to_string();

        let mut url = Url::parse(&self.parent.base_url)?;
        url.set_path(&format!("/storage/v1/object/{}/{}", self.bucket_id, path));

        let opts = options.unwrap_or_default();
        let mut part = Part::stream(data).file_name(file_name);
        if let Some(content_type) = &opts.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part);

        debug!("POST {} ({})", url, self.bucket_id);

        let mut request = self
            .parent
            .http_client
            .post(url)
            .header("apikey", &self.parent.api_key)
            .header("Authorization", self.parent.bearer())
            .header(
                "x-upsert",
                opts.upsert.unwrap_or(false).to_string(),
            );
        if let Some(cache_control) = &opts.cache_control {
            request = request.header("cache-control", format!("max-age={}", cache_control));
        }

        let response = request.multipart(form).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(StorageError::ApiError(error_text));
        }

        let uploaded = response.json::<UploadedObject>().await?;

        Ok(uploaded)
    }

    /// Public URL of an object in a public bucket
    pub fn get_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.parent.base_url,
            self.bucket_id,
            path.trim_start_matches('/')
        )
    }
}
