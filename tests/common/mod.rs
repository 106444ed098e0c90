#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use hasad::auth::UserId;
use hasad::config::ClientOptions;
use hasad::error::{Error, Result};
use hasad::farm::{
    CropType, FarmCollectionManager, FarmDraftForm, FarmField, FarmId, FarmPayload, FarmRecord,
    FarmStatus, FarmStore, HousingType, Prompt,
};
use hasad::i18n::{Catalog, Language};

pub const USER: &str = "user-1";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(UserId),
    Insert(FarmPayload),
    Update(FarmId, FarmPayload),
    Delete(FarmId),
    Upload(String),
}

/// Farm table kept in memory, recording every call made against it
#[derive(Default)]
pub struct InMemoryFarmStore {
    pub rows: Mutex<Vec<FarmRecord>>,
    pub calls: Mutex<Vec<Call>>,
    pub fail_list: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_upload: AtomicBool,
}

impl InMemoryFarmStore {
    pub fn with_rows(rows: Vec<FarmRecord>) -> Arc<Self> {
        let store = Self::default();
        *store.rows.lock().unwrap() = rows;
        Arc::new(store)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Insert(_) | Call::Update(..)))
            .count()
    }

    pub fn lists(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::List(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_created_at(&self) -> DateTime<Utc> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .map(|row| row.created_at)
            .max()
            .map(|latest| latest + Duration::minutes(1))
            .unwrap_or_else(|| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }
}

fn row_from(farm_id: FarmId, payload: &FarmPayload, created_at: DateTime<Utc>) -> FarmRecord {
    FarmRecord {
        farm_id,
        user_id: payload.user_id.clone(),
        farm_name: payload.farm_name.clone(),
        farm_email: payload.farm_email.clone(),
        farm_mobile: payload.farm_mobile.clone(),
        roof_area: payload.roof_area,
        location: payload.location.clone(),
        housing_type: payload.housing_type,
        roof_photo_url: payload.roof_photo_url.clone(),
        desired_crop_types: payload.desired_crop_types.clone(),
        available_budget: payload.available_budget,
        status: payload.status,
        created_at,
    }
}

#[async_trait]
impl FarmStore for InMemoryFarmStore {
    async fn list(&self, user_id: &UserId) -> Result<Vec<FarmRecord>> {
        self.record(Call::List(user_id.clone()));
        tokio::task::yield_now().await;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::general("connection refused"));
        }

        let mut rows: Vec<FarmRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, payload: &FarmPayload) -> Result<FarmRecord> {
        self.record(Call::Insert(payload.clone()));
        tokio::task::yield_now().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::general("insert rejected"));
        }

        let created_at = self.next_created_at();
        let mut rows = self.rows.lock().unwrap();
        let row = row_from(FarmId::new(format!("farm-{}", rows.len() + 1)), payload, created_at);
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, farm_id: &FarmId, payload: &FarmPayload) -> Result<FarmRecord> {
        self.record(Call::Update(farm_id.clone(), payload.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::general("update rejected"));
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| &row.farm_id == farm_id)
            .ok_or_else(|| Error::general("no such farm"))?;
        *row = row_from(farm_id.clone(), payload, row.created_at);
        Ok(row.clone())
    }

    async fn delete(&self, farm_id: &FarmId) -> Result<()> {
        self.record(Call::Delete(farm_id.clone()));
        tokio::task::yield_now().await;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::general("permission denied"));
        }
        self.rows.lock().unwrap().retain(|row| &row.farm_id != farm_id);
        Ok(())
    }

    async fn upload_blob(&self, path: &str, _data: Bytes, _content_type: &str) -> Result<String> {
        self.record(Call::Upload(path.to_string()));
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(Error::general("bucket not found"));
        }
        Ok(format!("https://cdn.example/farm-photos/{}", path))
    }
}

/// Answers every confirmation the same way and remembers what was shown
pub struct ScriptedPrompt {
    pub answer: bool,
    pub questions: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            questions: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn confirm(&self, message: &str) -> bool {
        self.questions.lock().unwrap().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub fn manager(store: Arc<InMemoryFarmStore>, prompt: Arc<ScriptedPrompt>) -> FarmCollectionManager {
    FarmCollectionManager::new(
        UserId::new(USER),
        store,
        Arc::new(Catalog::new(Language::En)),
        prompt,
        ClientOptions::default(),
    )
}

pub fn farm(id: &str, day: u32, status: FarmStatus) -> FarmRecord {
    FarmRecord {
        farm_id: FarmId::new(id),
        user_id: UserId::new(USER),
        farm_name: format!("Roof {}", id),
        farm_email: "roof@hasad.sa".to_string(),
        farm_mobile: "+966512345678".to_string(),
        roof_area: 35.0,
        location: "Jeddah".to_string(),
        housing_type: HousingType::Owned,
        roof_photo_url: Some(format!("https://cdn.example/farm-photos/{}.jpg", id)),
        desired_crop_types: [CropType::Lettuce, CropType::Strawberries].into_iter().collect(),
        available_budget: 1200.0,
        status,
        created_at: Utc.with_ymd_and_hms(2023, 12, day, 9, 0, 0).unwrap(),
    }
}

/// Fills a form with the "Green Roof" farm
pub fn fill_green_roof(form: &FarmDraftForm) {
    form.set_field(FarmField::FarmName("Green Roof".to_string()));
    form.set_field(FarmField::FarmEmail("a@b.com".to_string()));
    form.set_field(FarmField::FarmMobile("0512345678".to_string()));
    form.set_field(FarmField::RoofArea(Some(20.0)));
    form.set_field(FarmField::Location("Riyadh".to_string()));
    form.toggle_crop(CropType::Tomatoes);
    form.set_field(FarmField::AvailableBudget(Some(500.0)));
}
