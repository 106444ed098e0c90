//! Persistence of farm rows and roof photos

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::Value;

use hasad_postgrest::{PostgrestClient, SortOrder};
use hasad_storage::{FileOptions, StorageClient};

use super::model::{FarmId, FarmPayload, FarmRecord};
use crate::auth::UserId;
use crate::config::ClientOptions;
use crate::error::{Error, Result};

/// CRUD over farm rows plus blob storage for their photos
#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Farms owned by `user_id`, newest first
    async fn list(&self, user_id: &UserId) -> Result<Vec<FarmRecord>>;

    async fn insert(&self, payload: &FarmPayload) -> Result<FarmRecord>;

    async fn update(&self, farm_id: &FarmId, payload: &FarmPayload) -> Result<FarmRecord>;

    async fn delete(&self, farm_id: &FarmId) -> Result<()>;

    /// Stores `data` at `path` and returns its public URL
    async fn upload_blob(&self, path: &str, data: Bytes, content_type: &str) -> Result<String>;
}

/// [`FarmStore`] backed by the Supabase REST and Storage APIs
pub struct SupabaseFarmStore {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    options: ClientOptions,
    http_client: Client,
}

impl SupabaseFarmStore {
    pub fn new(base_url: &str, anon_key: &str, options: ClientOptions, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: None,
            options,
            http_client,
        }
    }

    /// Act as the signed-in user so row level security applies
    pub fn with_auth(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    fn table(&self) -> Result<PostgrestClient> {
        let mut client = PostgrestClient::new(
            &self.base_url,
            &self.anon_key,
            &self.options.farms_table,
            self.http_client.clone(),
        )?;
        if self.options.db_schema != "public" {
            client = client.with_schema(&self.options.db_schema)?;
        }
        if let Some(token) = &self.access_token {
            client = client.with_auth(token)?;
        }
        Ok(client)
    }

    fn storage(&self) -> StorageClient {
        let storage = StorageClient::new(&self.base_url, &self.anon_key, self.http_client.clone());
        match &self.access_token {
            Some(token) => storage.with_auth(token),
            None => storage,
        }
    }

    fn first_row(value: Value, operation: &str) -> Result<FarmRecord> {
        serde_json::from_value::<Vec<FarmRecord>>(value)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::general(format!("{} returned no farm row", operation)))
    }
}

#[async_trait]
impl FarmStore for SupabaseFarmStore {
    async fn list(&self, user_id: &UserId) -> Result<Vec<FarmRecord>> {
        let farms = self
            .table()?
            .select("*")
            .eq("user_id", user_id.as_str())
            .order("created_at", SortOrder::Descending)
            .execute::<FarmRecord>()
            .await?;
        Ok(farms)
    }

    async fn insert(&self, payload: &FarmPayload) -> Result<FarmRecord> {
        let value = self.table()?.insert(vec![payload]).await?;
        Self::first_row(value, "insert")
    }

    async fn update(&self, farm_id: &FarmId, payload: &FarmPayload) -> Result<FarmRecord> {
        let value = self
            .table()?
            .eq("farm_id", farm_id.as_str())
            .update(payload)
            .await?;
        Self::first_row(value, "update")
    }

    async fn delete(&self, farm_id: &FarmId) -> Result<()> {
        self.table()?.eq("farm_id", farm_id.as_str()).delete().await?;
        Ok(())
    }

    async fn upload_blob(&self, path: &str, data: Bytes, content_type: &str) -> Result<String> {
        let storage = self.storage();
        let bucket = storage.from(&self.options.photo_bucket);
        bucket
            .upload(
                path,
                data,
                Some(
                    FileOptions::new()
                        .with_content_type(content_type)
                        .with_cache_control("3600"),
                ),
            )
            .await?;
        Ok(bucket.get_public_url(path))
    }
}
