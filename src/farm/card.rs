//! Read-only view of one farm in the list

use super::model::{FarmId, FarmRecord, FarmStatus};
use crate::i18n::{format_amount, format_date, TextDirection, Translator};

#[derive(Debug, Clone, PartialEq)]
pub struct FarmCard {
    pub farm_id: FarmId,
    pub title: String,
    pub status: FarmStatus,
    pub status_label: String,
    pub location: String,
    /// `20 m² • Rental`
    pub area_line: String,
    /// `500 SAR`
    pub budget_line: String,
    pub crop_labels: Vec<String>,
    /// `Created: 2/14/2024`
    pub created_line: String,
    pub photo_url: Option<String>,
    pub direction: TextDirection,
}

impl FarmCard {
    pub fn new(record: &FarmRecord, translator: &dyn Translator) -> Self {
        let language = translator.language();

        Self {
            farm_id: record.farm_id.clone(),
            title: record.farm_name.clone(),
            status: record.status,
            status_label: translator.translate(record.status.label_key()),
            location: record.location.clone(),
            area_line: format!(
                "{} {} • {}",
                format_amount(record.roof_area, language),
                translator.translate("roofAreaUnit"),
                translator.translate(record.ownership_status().label_key())
            ),
            budget_line: format!(
                "{} {}",
                format_amount(record.available_budget, language),
                translator.translate("budgetUnit")
            ),
            crop_labels: record
                .desired_crop_types
                .iter()
                .map(|crop| translator.translate(crop.label_key()))
                .collect(),
            created_line: format!(
                "{}: {}",
                translator.translate("created"),
                format_date(&record.created_at, language)
            ),
            photo_url: record.roof_photo_url.clone(),
            direction: translator.direction(),
        }
    }
}
