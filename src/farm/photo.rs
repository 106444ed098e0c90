//! Roof photo selection, preview and upload

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, Weak};

use super::error::FarmError;
use super::store::FarmStore;
use crate::auth::UserId;
use crate::error::Result;

/// A local image picked by the user
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile {
    pub name: String,
    pub bytes: Bytes,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    /// Text after the last dot of the file name
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or_default()
    }

    fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type(), STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Default)]
struct PreviewSlot {
    generation: u64,
    data_url: Option<String>,
}

/// Holds the optional photo of a draft until submit
#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    max_bytes: u64,
    folder: String,
    selected: Option<PhotoFile>,
    preview: Arc<Mutex<PreviewSlot>>,
}

impl PhotoAttachment {
    pub fn new(max_bytes: u64, folder: &str) -> Self {
        Self {
            max_bytes,
            folder: folder.trim_matches('/').to_string(),
            selected: None,
            preview: Arc::new(Mutex::new(PreviewSlot::default())),
        }
    }

    pub fn selected(&self) -> Option<&PhotoFile> {
        self.selected.as_ref()
    }

    /// Keeps `file` for upload at submit time and starts building its preview.
    ///
    /// Files above the size limit are rejected and the previous selection is
    /// left as it was.
    pub fn select_file(&mut self, file: PhotoFile) -> std::result::Result<(), FarmError> {
        let size = file.size();
        if size > self.max_bytes {
            return Err(FarmError::PhotoTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let generation = {
            let mut slot = lock(&self.preview);
            slot.generation += 1;
            slot.data_url = None;
            slot.generation
        };
        spawn_preview(Arc::downgrade(&self.preview), generation, file.clone());

        debug!("selected roof photo {} ({} bytes)", file.name, size);
        self.selected = Some(file);
        Ok(())
    }

    /// Data URL of the selected photo, once it has been generated
    pub fn preview(&self) -> Option<String> {
        lock(&self.preview).data_url.clone()
    }

    /// URL to store with the farm.
    ///
    /// Without a new selection the existing URL is kept. A failed upload
    /// yields `None` and the farm is saved without a photo.
    pub async fn resolve_uploaded_url(
        &self,
        store: &dyn FarmStore,
        user_id: &UserId,
        existing_url: Option<String>,
        submitted_at: DateTime<Utc>,
    ) -> Option<String> {
        let file = match &self.selected {
            Some(file) => file,
            None => return existing_url,
        };

        let path = self.object_path(file, user_id, submitted_at);
        match store
            .upload_blob(&path, file.bytes.clone(), &file.content_type())
            .await
        {
            Ok(url) => {
                info!("uploaded roof photo to {}", path);
                Some(url)
            }
            Err(err) => {
                let err = FarmError::Upload(err);
                warn!("{}, saving without photo", err);
                None
            }
        }
    }

    fn object_path(&self, file: &PhotoFile, user_id: &UserId, submitted_at: DateTime<Utc>) -> String {
        let name = format!(
            "{}_{}.{}",
            user_id,
            submitted_at.timestamp_millis(),
            file.extension()
        );
        if self.folder.is_empty() {
            name
        } else {
            format!("{}/{}", self.folder, name)
        }
    }
}

fn lock(slot: &Mutex<PreviewSlot>) -> std::sync::MutexGuard<'_, PreviewSlot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Runs off the caller's task when a runtime is available. The result is
// dropped if the attachment was released or another file was picked.
fn spawn_preview(slot: Weak<Mutex<PreviewSlot>>, generation: u64, file: PhotoFile) {
    let build = move || {
        let data_url = file.data_url();
        match slot.upgrade() {
            Some(slot) => {
                let mut slot = lock(&slot);
                if slot.generation == generation {
                    slot.data_url = Some(data_url);
                }
            }
            None => debug!("discarding preview of released attachment"),
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(build);
        }
        Err(_) => build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PHOTO_BYTES;
    use crate::farm::model::{FarmId, FarmPayload, FarmRecord};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::time::Duration;

    #[derive(Default)]
    struct BlobStore {
        fail: bool,
        uploads: Mutex<Vec<(String, usize, String)>>,
    }

    #[async_trait]
    impl FarmStore for BlobStore {
        async fn list(&self, _user_id: &UserId) -> Result<Vec<FarmRecord>> {
            Ok(Vec::new())
        }

        async fn insert(&self, _payload: &FarmPayload) -> Result<FarmRecord> {
            Err(crate::error::Error::general("unused"))
        }

        async fn update(&self, _farm_id: &FarmId, _payload: &FarmPayload) -> Result<FarmRecord> {
            Err(crate::error::Error::general("unused"))
        }

        async fn delete(&self, _farm_id: &FarmId) -> Result<()> {
            Ok(())
        }

        async fn upload_blob(&self, path: &str, data: Bytes, content_type: &str) -> Result<String> {
            self.uploads
                .lock()
                .unwrap()
                .push((path.to_string(), data.len(), content_type.to_string()));
            if self.fail {
                return Err(crate::error::Error::general("bucket unavailable"));
            }
            Ok(format!("https://cdn.example/{}", path))
        }
    }

    fn photo(size: usize) -> PhotoFile {
        PhotoFile::new("roof.jpg", vec![0u8; size])
    }

    #[test]
    fn size_limit_boundary() {
        let mut attachment = PhotoAttachment::new(MAX_PHOTO_BYTES, "roof-photos");

        let err = attachment
            .select_file(photo(MAX_PHOTO_BYTES as usize + 1))
            .unwrap_err();
        assert!(matches!(err, FarmError::PhotoTooLarge { size, .. } if size == MAX_PHOTO_BYTES + 1));
        assert_eq!(err.message_key(), "photoTooLarge");
        assert!(attachment.selected().is_none());

        attachment.select_file(photo(MAX_PHOTO_BYTES as usize)).unwrap();
        assert_eq!(attachment.selected().unwrap().size(), MAX_PHOTO_BYTES);
    }

    #[test]
    fn preview_without_runtime_is_immediate() {
        let mut attachment = PhotoAttachment::new(1024, "roof-photos");
        attachment.select_file(PhotoFile::new("roof.png", vec![1, 2, 3])).unwrap();
        assert_eq!(attachment.preview().as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn preview_is_generated_in_the_background() {
        let mut attachment = PhotoAttachment::new(1024, "roof-photos");
        attachment.select_file(PhotoFile::new("roof.jpg", vec![1, 2, 3])).unwrap();

        let mut preview = None;
        for _ in 0..100 {
            preview = attachment.preview();
            if preview.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(preview.as_deref(), Some("data:image/jpeg;base64,AQID"));
    }

    #[tokio::test]
    async fn keeps_existing_url_without_new_file() {
        let store = BlobStore::default();
        let attachment = PhotoAttachment::new(1024, "roof-photos");

        let url = attachment
            .resolve_uploaded_url(
                &store,
                &UserId::new("u1"),
                Some("https://cdn.example/old.jpg".to_string()),
                Utc::now(),
            )
            .await;

        assert_eq!(url.as_deref(), Some("https://cdn.example/old.jpg"));
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn uploads_under_user_and_timestamp() {
        let store = BlobStore::default();
        let mut attachment = PhotoAttachment::new(1024, "roof-photos");
        attachment.select_file(PhotoFile::new("my.roof.JPG", vec![7; 10])).unwrap();
        let submitted_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let url = attachment
            .resolve_uploaded_url(&store, &UserId::new("u1"), None, submitted_at)
            .await;

        assert_eq!(
            url.as_deref(),
            Some("https://cdn.example/roof-photos/u1_1700000000000.JPG")
        );
        let uploads = store.uploads.lock().unwrap();
        assert_eq!(
            uploads[0],
            ("roof-photos/u1_1700000000000.JPG".to_string(), 10, "image/jpeg".to_string())
        );
    }

    #[tokio::test]
    async fn failed_upload_degrades_to_no_photo() {
        let store = BlobStore {
            fail: true,
            ..Default::default()
        };
        let mut attachment = PhotoAttachment::new(1024, "roof-photos");
        attachment.select_file(photo(10)).unwrap();

        let url = attachment
            .resolve_uploaded_url(
                &store,
                &UserId::new("u1"),
                Some("https://cdn.example/old.jpg".to_string()),
                Utc::now(),
            )
            .await;

        assert!(url.is_none());
        assert_eq!(store.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reads_photo_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roof.webp");
        std::fs::write(&path, b"RIFF").unwrap();

        let file = PhotoFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "roof.webp");
        assert_eq!(file.size(), 4);
        assert_eq!(file.extension(), "webp");
    }
}
