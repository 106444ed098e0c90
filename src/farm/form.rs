//! Editing surface for creating or updating one farm

use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use super::error::FarmError;
use super::model::{
    CropType, FarmDraft, FarmId, FarmPayload, FarmRecord, HousingType, OwnershipStatus,
    ParseEnumError,
};
use super::photo::{PhotoAttachment, PhotoFile};
use super::store::FarmStore;
use super::validation;
use crate::auth::UserId;
use crate::config::ClientOptions;
use crate::i18n::Translator;

/// One editable field with its new value
#[derive(Debug, Clone, PartialEq)]
pub enum FarmField {
    FarmName(String),
    FarmEmail(String),
    FarmMobile(String),
    RoofArea(Option<f64>),
    Location(String),
    HousingType(HousingType),
    AvailableBudget(Option<f64>),
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown farm field: {0}")]
    Unknown(String),

    #[error(transparent)]
    Value(#[from] ParseEnumError),
}

impl FarmField {
    /// Parses raw input for the column called `name`. Numbers that do not
    /// parse, or are not finite, become `None` and are caught by validation.
    pub fn from_input(name: &str, raw: &str) -> Result<Self, FieldError> {
        let number = || {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
        };
        Ok(match name {
            "farm_name" => FarmField::FarmName(raw.to_string()),
            "farm_email" => FarmField::FarmEmail(raw.to_string()),
            "farm_mobile" => FarmField::FarmMobile(raw.to_string()),
            "roof_area" => FarmField::RoofArea(number()),
            "location" => FarmField::Location(raw.to_string()),
            "housing_type" => FarmField::HousingType(raw.trim().parse()?),
            "available_budget" => FarmField::AvailableBudget(number()),
            other => return Err(FieldError::Unknown(other.to_string())),
        })
    }
}

impl FarmDraft {
    /// Ownership is derived from the housing type, so setting the housing
    /// type is all it takes to keep the two in step.
    pub fn set(&mut self, field: FarmField) {
        match field {
            FarmField::FarmName(value) => self.farm_name = value,
            FarmField::FarmEmail(value) => self.farm_email = value,
            FarmField::FarmMobile(value) => self.farm_mobile = value,
            FarmField::RoofArea(value) => self.roof_area = value,
            FarmField::Location(value) => self.location = value,
            FarmField::HousingType(value) => self.housing_type = value,
            FarmField::AvailableBudget(value) => self.available_budget = value,
        }
    }
}

/// Result of a submit that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(FarmRecord),
    /// Another submit was in flight or the form is closed
    Ignored,
}

struct DraftState {
    existing: Option<FarmRecord>,
    draft: FarmDraft,
    photo: PhotoAttachment,
    error: Option<String>,
    open: bool,
}

/// Stateful farm editor. Methods take `&self` so the form can be shared with
/// whatever renders it while a submit is running.
pub struct FarmDraftForm {
    user_id: UserId,
    store: Arc<dyn FarmStore>,
    translator: Arc<dyn Translator>,
    max_photo_bytes: u64,
    photo_folder: String,
    state: Mutex<DraftState>,
    submitting: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FarmDraftForm {
    /// Creates an open form in create mode
    pub fn new(
        user_id: UserId,
        store: Arc<dyn FarmStore>,
        translator: Arc<dyn Translator>,
        options: &ClientOptions,
    ) -> Self {
        Self {
            user_id,
            store,
            translator,
            max_photo_bytes: options.max_photo_bytes,
            photo_folder: options.photo_folder.clone(),
            state: Mutex::new(DraftState {
                existing: None,
                draft: FarmDraft::default(),
                photo: PhotoAttachment::new(options.max_photo_bytes, &options.photo_folder),
                error: None,
                open: true,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    /// Seeds the draft from `existing` (edit mode) or from defaults (create
    /// mode), dropping any selected photo and error.
    pub fn initialize(&self, existing: Option<&FarmRecord>) {
        let mut state = self.lock();
        state.draft = existing.map(FarmDraft::from_record).unwrap_or_default();
        state.existing = existing.cloned();
        state.photo = PhotoAttachment::new(self.max_photo_bytes, &self.photo_folder);
        state.error = None;
        state.open = true;
    }

    pub fn set_field(&self, field: FarmField) {
        self.lock().draft.set(field);
    }

    pub fn toggle_crop(&self, crop: CropType) {
        self.lock().draft.desired_crop_types.toggle(crop);
    }

    pub fn select_file(&self, file: PhotoFile) -> Result<(), FarmError> {
        let mut state = self.lock();
        match state.photo.select_file(file) {
            Ok(()) => Ok(()),
            Err(err) => {
                state.error = Some(err.localized(self.translator.as_ref()));
                Err(err)
            }
        }
    }

    pub fn draft(&self) -> FarmDraft {
        self.lock().draft.clone()
    }

    pub fn ownership_status(&self) -> OwnershipStatus {
        self.lock().draft.ownership_status()
    }

    /// Farm being edited; `None` in create mode
    pub fn farm_id(&self) -> Option<FarmId> {
        self.lock().existing.as_ref().map(|farm| farm.farm_id.clone())
    }

    pub fn preview(&self) -> Option<String> {
        self.lock().photo.preview()
    }

    /// Localized message of the last failure
    pub fn error_message(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn close(&self) {
        self.lock().open = false;
    }

    /// Validates and saves the draft.
    ///
    /// Invalid drafts fail without any I/O. A persistence failure keeps the
    /// draft and leaves the form open for another try. On success the form
    /// closes and the stored row is returned with status `pending`.
    pub async fn submit(&self) -> Result<SubmitOutcome, FarmError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("ignoring farm submit while another is in flight");
            return Ok(SubmitOutcome::Ignored);
        }
        let _in_flight = InFlight(&self.submitting);

        let (draft, photo, existing) = {
            let state = self.lock();
            if !state.open {
                debug!("ignoring submit of a closed farm form");
                return Ok(SubmitOutcome::Ignored);
            }
            (state.draft.clone(), state.photo.clone(), state.existing.clone())
        };

        if let Err(err) = validation::validate(&draft) {
            debug!("farm draft rejected: {}", err);
            return Err(self.fail(FarmError::Validation(err)));
        }
        self.lock().error = None;

        let existing_url = existing.as_ref().and_then(|farm| farm.roof_photo_url.clone());
        let roof_photo_url = photo
            .resolve_uploaded_url(self.store.as_ref(), &self.user_id, existing_url, Utc::now())
            .await;

        let payload = FarmPayload::from_draft(self.user_id.clone(), &draft, roof_photo_url)
            .map_err(|err| self.fail(FarmError::Validation(err)))?;

        let saved = match &existing {
            Some(farm) => self.store.update(&farm.farm_id, &payload).await,
            None => self.store.insert(&payload).await,
        };

        match saved {
            Ok(record) => {
                info!(
                    "{} farm {} for {}",
                    if existing.is_some() { "updated" } else { "registered" },
                    record.farm_id,
                    self.user_id
                );
                let mut state = self.lock();
                state.error = None;
                state.open = false;
                Ok(SubmitOutcome::Saved(record))
            }
            Err(err) => {
                error!("saving farm failed: {}", err);
                Err(self.fail(FarmError::Persistence(err)))
            }
        }
    }

    fn fail(&self, err: FarmError) -> FarmError {
        self.lock().error = Some(err.localized(self.translator.as_ref()));
        err
    }

    fn lock(&self) -> MutexGuard<'_, DraftState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
