//! The signed-in farmer's list of farms

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::card::FarmCard;
use super::error::FarmError;
use super::form::{FarmDraftForm, SubmitOutcome};
use super::model::{FarmId, FarmRecord};
use super::store::FarmStore;
use crate::auth::UserId;
use crate::config::ClientOptions;
use crate::i18n::Translator;

/// Blocking yes/no questions and alerts shown to the user
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;

    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user said no
    Declined,
    /// A delete of the same farm is still running
    AlreadyPending,
    /// The store refused; the user has been alerted
    Failed,
}

/// What the editing surface currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    Creating,
    Editing(FarmId),
}

struct Editor {
    form: Arc<FarmDraftForm>,
    target: Option<FarmId>,
}

#[derive(Default)]
struct CollectionState {
    farms: Vec<FarmRecord>,
    loading: bool,
    deleting: HashSet<FarmId>,
    editor: Option<Editor>,
}

/// Owns the farm list of one user. The list is replaced on every load and
/// patched in place after a delete; the draft form never writes to it.
pub struct FarmCollectionManager {
    user_id: UserId,
    store: Arc<dyn FarmStore>,
    translator: Arc<dyn Translator>,
    prompt: Arc<dyn Prompt>,
    options: ClientOptions,
    state: Mutex<CollectionState>,
    released: AtomicBool,
}

impl FarmCollectionManager {
    pub fn new(
        user_id: UserId,
        store: Arc<dyn FarmStore>,
        translator: Arc<dyn Translator>,
        prompt: Arc<dyn Prompt>,
        options: ClientOptions,
    ) -> Self {
        Self {
            user_id,
            store,
            translator,
            prompt,
            options,
            state: Mutex::new(CollectionState::default()),
            released: AtomicBool::new(false),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Snapshot of the list, newest first
    pub fn farms(&self) -> Vec<FarmRecord> {
        self.lock().farms.clone()
    }

    pub fn cards(&self) -> Vec<FarmCard> {
        self.lock()
            .farms
            .iter()
            .map(|farm| FarmCard::new(farm, self.translator.as_ref()))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether the delete control of `farm_id` should be disabled
    pub fn is_deleting(&self, farm_id: &FarmId) -> bool {
        self.lock().deleting.contains(farm_id)
    }

    /// Refetches the list. Failures are logged and leave the current list in
    /// place.
    pub async fn load(&self) {
        self.lock().loading = true;

        let result = self.store.list(&self.user_id).await;
        if self.is_released() {
            debug!("discarding farm list for released view");
            return;
        }

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(farms) => {
                debug!("loaded {} farms for {}", farms.len(), self.user_id);
                state.farms = farms;
            }
            Err(err) => warn!("fetching farms for {} failed: {}", self.user_id, err),
        }
    }

    /// Deletes a farm after the user confirms. Other farms stay actionable
    /// while this runs.
    pub async fn request_delete(&self, farm_id: &FarmId) -> DeleteOutcome {
        if self.is_deleting(farm_id) {
            return DeleteOutcome::AlreadyPending;
        }

        let question = self.translator.translate("confirmDeleteFarm");
        if !self.prompt.confirm(&question).await {
            return DeleteOutcome::Declined;
        }

        if !self.lock().deleting.insert(farm_id.clone()) {
            return DeleteOutcome::AlreadyPending;
        }

        let result = self.store.delete(farm_id).await;

        let mut state = self.lock();
        state.deleting.remove(farm_id);
        match result {
            Ok(()) => {
                info!("deleted farm {}", farm_id);
                if self.is_released() {
                    debug!("farm {} deleted after view was released", farm_id);
                } else {
                    state.farms.retain(|farm| &farm.farm_id != farm_id);
                }
                DeleteOutcome::Deleted
            }
            Err(err) => {
                drop(state);
                error!("deleting farm {} failed: {}", farm_id, err);
                if !self.is_released() {
                    self.prompt.alert(&self.translator.translate("farmRegistrationError"));
                }
                DeleteOutcome::Failed
            }
        }
    }

    /// Opens an empty form; replaces any open editor
    pub fn begin_create(&self) -> Arc<FarmDraftForm> {
        self.open_editor(None)
    }

    pub fn begin_edit(&self, farm: &FarmRecord) -> Arc<FarmDraftForm> {
        self.open_editor(Some(farm))
    }

    pub fn cancel(&self) {
        if let Some(editor) = self.lock().editor.take() {
            editor.form.close();
        }
    }

    pub fn editor(&self) -> EditorState {
        match &self.lock().editor {
            None => EditorState::Closed,
            Some(Editor { target: None, .. }) => EditorState::Creating,
            Some(Editor {
                target: Some(farm_id),
                ..
            }) => EditorState::Editing(farm_id.clone()),
        }
    }

    pub fn form(&self) -> Option<Arc<FarmDraftForm>> {
        self.lock().editor.as_ref().map(|editor| editor.form.clone())
    }

    /// Submits the open form. A saved farm closes the editor and reloads
    /// the list to pick up server-assigned fields.
    pub async fn submit_draft(&self) -> Result<SubmitOutcome, FarmError> {
        let form = match self.form() {
            Some(form) => form,
            None => return Ok(SubmitOutcome::Ignored),
        };

        let outcome = form.submit().await?;
        if let SubmitOutcome::Saved(_) = &outcome {
            {
                let mut state = self.lock();
                let same_editor = state
                    .editor
                    .as_ref()
                    .map_or(false, |editor| Arc::ptr_eq(&editor.form, &form));
                if same_editor {
                    state.editor = None;
                }
            }
            self.on_draft_submitted().await;
        }
        Ok(outcome)
    }

    pub async fn on_draft_submitted(&self) {
        self.load().await;
    }

    /// Marks the view as gone; responses arriving later are dropped
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
        self.cancel();
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn open_editor(&self, farm: Option<&FarmRecord>) -> Arc<FarmDraftForm> {
        let form = Arc::new(FarmDraftForm::new(
            self.user_id.clone(),
            self.store.clone(),
            self.translator.clone(),
            &self.options,
        ));
        form.initialize(farm);

        let mut state = self.lock();
        if let Some(previous) = state.editor.take() {
            previous.form.close();
        }
        state.editor = Some(Editor {
            form: form.clone(),
            target: farm.map(|farm| farm.farm_id.clone()),
        });
        form
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
