use thiserror::Error;

use super::validation::ValidationError;
use crate::error::Error;
use crate::i18n::Translator;

/// Failures surfaced by the farm form and list
#[derive(Error, Debug)]
pub enum FarmError {
    #[error("invalid farm: {0}")]
    Validation(#[from] ValidationError),

    #[error("photo is {size} bytes, the limit is {limit}")]
    PhotoTooLarge { size: u64, limit: u64 },

    #[error("photo upload failed: {0}")]
    Upload(#[source] Error),

    #[error("farm could not be saved: {0}")]
    Persistence(#[source] Error),
}

impl FarmError {
    /// Translation key shown to the user; backend details never reach it
    pub fn message_key(&self) -> &'static str {
        match self {
            FarmError::Validation(err) => err.message_key(),
            FarmError::PhotoTooLarge { .. } => "photoTooLarge",
            FarmError::Upload(_) => "photoUploadError",
            FarmError::Persistence(_) => "farmRegistrationError",
        }
    }

    pub fn localized(&self, translator: &dyn Translator) -> String {
        translator.translate(self.message_key())
    }
}
