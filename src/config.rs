//! Configuration for the Hasad client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Upper bound for roof photos: 5 MiB
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Project endpoint and anonymous key
#[derive(Debug, Clone)]
pub struct HasadConfig {
    pub url: Url,
    pub anon_key: String,
}

impl HasadConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str, anon_key: &str) -> Result<Self> {
        let url = Url::parse(url_str)?;
        if anon_key.is_empty() {
            return Err(Error::config("anon_key cannot be empty"));
        }
        Ok(Self {
            url,
            anon_key: anon_key.to_string(),
        })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var("SUPABASE_URL")
            .map_err(|_| Error::config("SUPABASE_URL environment variable not found"))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| Error::config("SUPABASE_ANON_KEY environment variable not found"))?;
        Self::new(&url_str, &anon_key)
    }

    /// Base URL without the trailing slash `Url` adds
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }
}

/// Configuration options for the Hasad client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The database schema
    pub db_schema: String,

    /// Table holding farm records
    pub farms_table: String,

    /// Storage bucket for roof photos
    pub photo_bucket: String,

    /// Folder inside the photo bucket
    pub photo_folder: String,

    /// Largest accepted roof photo, in bytes
    pub max_photo_bytes: u64,

    /// Edge function receiving support tickets
    pub support_function: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            db_schema: "public".to_string(),
            farms_table: "farms".to_string(),
            photo_bucket: "farm-photos".to_string(),
            photo_folder: "roof-photos".to_string(),
            max_photo_bytes: MAX_PHOTO_BYTES,
            support_function: "raise-support-ticket".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }

    /// Set the farms table
    pub fn with_farms_table(mut self, value: &str) -> Self {
        self.farms_table = value.to_string();
        self
    }

    /// Set the photo bucket
    pub fn with_photo_bucket(mut self, value: &str) -> Self {
        self.photo_bucket = value.to_string();
        self
    }

    /// Set the folder photos are uploaded into
    pub fn with_photo_folder(mut self, value: &str) -> Self {
        self.photo_folder = value.to_string();
        self
    }

    /// Set the photo size ceiling
    pub fn with_max_photo_bytes(mut self, value: u64) -> Self {
        self.max_photo_bytes = value;
        self
    }

    /// Set the support ticket function name
    pub fn with_support_function(mut self, value: &str) -> Self {
        self.support_function = value.to_string();
        self
    }
}
