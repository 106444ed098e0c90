//! Farm records, their enumerations and the write payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::validation::{self, ValidationError};
use crate::auth::UserId;

/// Server-assigned identifier of a farm
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FarmId(String);

impl FarmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    #[default]
    RentalSingles,
    RentalFamilies,
    Owned,
}

impl HousingType {
    pub const ALL: [HousingType; 3] = [
        HousingType::RentalSingles,
        HousingType::RentalFamilies,
        HousingType::Owned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HousingType::RentalSingles => "rental_singles",
            HousingType::RentalFamilies => "rental_families",
            HousingType::Owned => "owned",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            HousingType::RentalSingles => "rentalSingles",
            HousingType::RentalFamilies => "rentalFamilies",
            HousingType::Owned => "ownedProperty",
        }
    }
}

impl FromStr for HousingType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HousingType::ALL
            .into_iter()
            .find(|housing| housing.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("housing type", s))
    }
}

/// Whether the farmer owns the roof; always derived from [`HousingType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipStatus {
    Owned,
    Rental,
}

impl OwnershipStatus {
    pub fn from_housing(housing_type: HousingType) -> Self {
        match housing_type {
            HousingType::Owned => OwnershipStatus::Owned,
            HousingType::RentalSingles | HousingType::RentalFamilies => OwnershipStatus::Rental,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipStatus::Owned => "owned",
            OwnershipStatus::Rental => "rental",
        }
    }

    pub fn label_key(&self) -> &'static str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    Cucumber,
    Tomatoes,
    Lettuce,
    Strawberries,
    LeafyGreens,
}

impl CropType {
    pub const ALL: [CropType; 5] = [
        CropType::Cucumber,
        CropType::Tomatoes,
        CropType::Lettuce,
        CropType::Strawberries,
        CropType::LeafyGreens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Cucumber => "cucumber",
            CropType::Tomatoes => "tomatoes",
            CropType::Lettuce => "lettuce",
            CropType::Strawberries => "strawberries",
            CropType::LeafyGreens => "leafy_greens",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            CropType::LeafyGreens => "leafyGreens",
            other => other.as_str(),
        }
    }
}

impl FromStr for CropType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropType::ALL
            .into_iter()
            .find(|crop| crop.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("crop type", s))
    }
}

/// Set of desired crops; membership changes only through [`CropSet::toggle`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropSet(BTreeSet<CropType>);

impl CropSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the crop if absent, removes it if present
    pub fn toggle(&mut self, crop: CropType) {
        if !self.0.remove(&crop) {
            self.0.insert(crop);
        }
    }

    pub fn contains(&self, crop: CropType) -> bool {
        self.0.contains(&crop)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = CropType> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CropType> for CropSet {
    fn from_iter<I: IntoIterator<Item = CropType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Review state of a farm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmStatus {
    #[default]
    Pending,
    Active,
    Inactive,
}

/// Something that moves a farm between review states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    /// Reviewer approves a pending farm
    Approve,
    /// Reviewer takes an active farm offline
    Deactivate,
    /// Reviewer brings an inactive farm back
    Reactivate,
    /// Reviewer sends an active farm back to review
    Reopen,
    /// Owner saved changes to the farm
    OwnerEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} to a {from:?} farm")]
pub struct InvalidTransition {
    pub from: FarmStatus,
    pub event: ReviewEvent,
}

impl FarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmStatus::Pending => "pending",
            FarmStatus::Active => "active",
            FarmStatus::Inactive => "inactive",
        }
    }

    pub fn label_key(&self) -> &'static str {
        self.as_str()
    }

    pub fn transition(self, event: ReviewEvent) -> Result<FarmStatus, InvalidTransition> {
        use FarmStatus::*;
        use ReviewEvent::*;

        match (self, event) {
            (_, OwnerEdit) => Ok(Pending),
            (Pending, Approve) => Ok(Active),
            (Active, Deactivate) => Ok(Inactive),
            (Inactive, Reactivate) => Ok(Active),
            (Active, Reopen) => Ok(Pending),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A stored farm row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmRecord {
    pub farm_id: FarmId,
    pub user_id: UserId,
    pub farm_name: String,
    pub farm_email: String,
    pub farm_mobile: String,
    pub roof_area: f64,
    pub location: String,
    pub housing_type: HousingType,
    #[serde(default)]
    pub roof_photo_url: Option<String>,
    #[serde(default)]
    pub desired_crop_types: CropSet,
    pub available_budget: f64,
    #[serde(default)]
    pub status: FarmStatus,
    pub created_at: DateTime<Utc>,
}

impl FarmRecord {
    /// Derived from the housing type; a stored `ownership_status` column is ignored
    pub fn ownership_status(&self) -> OwnershipStatus {
        OwnershipStatus::from_housing(self.housing_type)
    }
}

/// In-progress edit of a farm
#[derive(Debug, Clone, PartialEq)]
pub struct FarmDraft {
    pub farm_name: String,
    pub farm_email: String,
    pub farm_mobile: String,
    pub roof_area: Option<f64>,
    pub location: String,
    pub housing_type: HousingType,
    pub desired_crop_types: CropSet,
    pub available_budget: Option<f64>,
}

impl Default for FarmDraft {
    fn default() -> Self {
        Self {
            farm_name: String::new(),
            farm_email: String::new(),
            farm_mobile: String::new(),
            roof_area: Some(0.0),
            location: String::new(),
            housing_type: HousingType::default(),
            desired_crop_types: CropSet::new(),
            available_budget: Some(0.0),
        }
    }
}

impl FarmDraft {
    pub fn from_record(record: &FarmRecord) -> Self {
        Self {
            farm_name: record.farm_name.clone(),
            farm_email: record.farm_email.clone(),
            farm_mobile: record.farm_mobile.clone(),
            roof_area: Some(record.roof_area),
            location: record.location.clone(),
            housing_type: record.housing_type,
            desired_crop_types: record.desired_crop_types.clone(),
            available_budget: Some(record.available_budget),
        }
    }

    pub fn ownership_status(&self) -> OwnershipStatus {
        OwnershipStatus::from_housing(self.housing_type)
    }
}

/// Row written on create and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmPayload {
    pub user_id: UserId,
    pub farm_name: String,
    pub farm_email: String,
    pub farm_mobile: String,
    pub roof_area: f64,
    pub location: String,
    pub housing_type: HousingType,
    pub ownership_status: OwnershipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roof_photo_url: Option<String>,
    pub desired_crop_types: CropSet,
    pub available_budget: f64,
    pub status: FarmStatus,
}

impl FarmPayload {
    /// Builds the row for a draft that passes validation. Status is always
    /// `pending`: every save goes back to review.
    pub fn from_draft(
        user_id: UserId,
        draft: &FarmDraft,
        roof_photo_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        validation::validate(draft)?;

        Ok(Self {
            user_id,
            farm_name: draft.farm_name.trim().to_string(),
            farm_email: draft.farm_email.trim().to_string(),
            farm_mobile: draft.farm_mobile.clone(),
            roof_area: draft.roof_area.ok_or(ValidationError::InvalidRoofArea)?,
            location: draft.location.trim().to_string(),
            housing_type: draft.housing_type,
            ownership_status: draft.ownership_status(),
            roof_photo_url,
            desired_crop_types: draft.desired_crop_types.clone(),
            available_budget: draft.available_budget.ok_or(ValidationError::InvalidBudget)?,
            status: FarmStatus::Pending,
        })
    }
}
