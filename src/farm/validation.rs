//! Submission rules for farm drafts
//!
//! Rules run in a fixed order and stop at the first failure, so a draft with
//! several problems reports only the earliest one.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::model::FarmDraft;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static SAUDI_MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+966|00966|966|05)[0-9]{8,9}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("farm name is required")]
    MissingFarmName,

    #[error("farm email is not a valid address")]
    InvalidEmail,

    #[error("farm mobile is not a Saudi mobile number")]
    InvalidMobile,

    #[error("roof area must be greater than zero")]
    InvalidRoofArea,

    #[error("location is required")]
    MissingLocation,

    #[error("at least one crop type must be selected")]
    NoCropSelected,

    #[error("available budget must be zero or more")]
    InvalidBudget,
}

impl ValidationError {
    /// Translation key shown to the user
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::MissingFarmName => "farmNameRequired",
            ValidationError::InvalidEmail => "invalidEmail",
            ValidationError::InvalidMobile => "invalidMobileNumber",
            ValidationError::InvalidRoofArea => "roofAreaRequired",
            ValidationError::MissingLocation => "locationRequired",
            ValidationError::NoCropSelected => "selectAtLeastOneCrop",
            ValidationError::InvalidBudget => "budgetRequired",
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// `+966`, `00966`, `966` or `05` followed by 8-9 digits; whitespace is ignored
pub fn is_valid_saudi_mobile(mobile: &str) -> bool {
    let compact: String = mobile.chars().filter(|c| !c.is_whitespace()).collect();
    SAUDI_MOBILE_PATTERN.is_match(&compact)
}

/// Checks a draft, returning the first rule it breaks
pub fn validate(draft: &FarmDraft) -> Result<(), ValidationError> {
    if draft.farm_name.trim().is_empty() {
        return Err(ValidationError::MissingFarmName);
    }
    if !is_valid_email(&draft.farm_email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_saudi_mobile(&draft.farm_mobile) {
        return Err(ValidationError::InvalidMobile);
    }
    // NaN compares false; infinities would serialize as null
    if !matches!(draft.roof_area, Some(area) if area.is_finite() && area > 0.0) {
        return Err(ValidationError::InvalidRoofArea);
    }
    if draft.location.trim().is_empty() {
        return Err(ValidationError::MissingLocation);
    }
    if draft.desired_crop_types.is_empty() {
        return Err(ValidationError::NoCropSelected);
    }
    if !matches!(draft.available_budget, Some(budget) if budget.is_finite() && budget >= 0.0) {
        return Err(ValidationError::InvalidBudget);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::model::CropType;

    fn valid_draft() -> FarmDraft {
        FarmDraft {
            farm_name: "Green Roof".to_string(),
            farm_email: "a@b.com".to_string(),
            farm_mobile: "0512345678".to_string(),
            roof_area: Some(20.0),
            location: "Riyadh".to_string(),
            desired_crop_types: [CropType::Tomatoes].into_iter().collect(),
            available_budget: Some(500.0),
            ..FarmDraft::default()
        }
    }

    #[test]
    fn accepts_a_complete_draft() {
        assert_eq!(validate(&valid_draft()), Ok(()));
    }

    #[test]
    fn mobile_numbers() {
        for ok in [
            "0512345678",
            "05 1234 5678",
            "+966512345678",
            "00966512345678",
            "966512345678",
            "0512345678 9",
        ] {
            assert!(is_valid_saudi_mobile(ok), "{} should be accepted", ok);
        }
        for bad in ["123456", "0612345678", "051234567", "+9665123456789012", "05123456ab", ""] {
            assert!(!is_valid_saudi_mobile(bad), "{} should be rejected", bad);
        }
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("farmer@hasad.sa"));
        assert!(!is_valid_email("farmer@hasad"));
        assert!(!is_valid_email("far mer@hasad.sa"));
        assert!(!is_valid_email("@hasad.sa"));
    }

    #[test]
    fn first_failure_wins() {
        let draft = FarmDraft {
            farm_email: "nope".to_string(),
            farm_mobile: "123456".to_string(),
            ..valid_draft()
        };
        assert_eq!(validate(&draft), Err(ValidationError::InvalidEmail));

        let draft = FarmDraft {
            farm_name: "   ".to_string(),
            ..draft
        };
        assert_eq!(validate(&draft), Err(ValidationError::MissingFarmName));
    }

    #[test]
    fn each_rule_has_its_own_key() {
        let cases = [
            (FarmDraft { farm_mobile: "123456".into(), ..valid_draft() }, "invalidMobileNumber"),
            (FarmDraft { roof_area: Some(0.0), ..valid_draft() }, "roofAreaRequired"),
            (FarmDraft { roof_area: None, ..valid_draft() }, "roofAreaRequired"),
            (FarmDraft { roof_area: Some(f64::NAN), ..valid_draft() }, "roofAreaRequired"),
            (FarmDraft { location: " ".into(), ..valid_draft() }, "locationRequired"),
            (FarmDraft { desired_crop_types: Default::default(), ..valid_draft() }, "selectAtLeastOneCrop"),
            (FarmDraft { available_budget: Some(-1.0), ..valid_draft() }, "budgetRequired"),
            (FarmDraft { available_budget: None, ..valid_draft() }, "budgetRequired"),
        ];

        for (draft, key) in cases {
            assert_eq!(validate(&draft).unwrap_err().message_key(), key);
        }
    }

    #[test]
    fn infinite_numbers_are_rejected() {
        for value in [f64::INFINITY, f64::NEG_INFINITY] {
            let draft = FarmDraft {
                roof_area: Some(value),
                ..valid_draft()
            };
            assert_eq!(validate(&draft), Err(ValidationError::InvalidRoofArea));

            let draft = FarmDraft {
                available_budget: Some(value),
                ..valid_draft()
            };
            assert_eq!(validate(&draft), Err(ValidationError::InvalidBudget));
        }
    }

    #[test]
    fn zero_budget_is_allowed() {
        let draft = FarmDraft {
            available_budget: Some(0.0),
            ..valid_draft()
        };
        assert_eq!(validate(&draft), Ok(()));
    }
}
