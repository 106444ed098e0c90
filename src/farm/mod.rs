//! Farm profiles: validation, photo attachment, the draft form and the
//! per-user farm list

mod card;
mod collection;
mod error;
mod form;
mod model;
mod photo;
mod store;
pub mod validation;

pub use card::FarmCard;
pub use collection::{DeleteOutcome, EditorState, FarmCollectionManager, Prompt};
pub use error::FarmError;
pub use form::{FarmDraftForm, FarmField, FieldError, SubmitOutcome};
pub use model::{
    CropSet, CropType, FarmDraft, FarmId, FarmPayload, FarmRecord, FarmStatus, HousingType,
    InvalidTransition, OwnershipStatus, ParseEnumError, ReviewEvent,
};
pub use photo::{PhotoAttachment, PhotoFile};
pub use store::{FarmStore, SupabaseFarmStore};
pub use validation::ValidationError;
