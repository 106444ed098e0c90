//! Localization: translated strings, language and text direction
//!
//! Every user-facing label and error of the core is resolved through a
//! [`Translator`]. [`Catalog`] is the built-in English/Arabic implementation.

mod catalog;
mod format;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::RwLock;

pub use format::{format_amount, format_date, humanize};

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Ar => TextDirection::Rtl,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "ar-SA" and friends map to their base language
        let base = s.split(['-', '_']).next().unwrap_or_default();
        match base.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            _ => Err(format!("unsupported language: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for an HTML `dir` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Key to localized string lookup
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;

    fn language(&self) -> Language;

    fn direction(&self) -> TextDirection {
        self.language().direction()
    }
}

/// Built-in English and Arabic strings
#[derive(Debug, Default)]
pub struct Catalog {
    language: RwLock<Language>,
}

impl Catalog {
    pub fn new(language: Language) -> Self {
        Self {
            language: RwLock::new(language),
        }
    }

    /// Switch the interface language
    pub fn set_language(&self, language: Language) {
        match self.language.write() {
            Ok(mut current) => *current = language,
            Err(poisoned) => *poisoned.into_inner() = language,
        }
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        match catalog::lookup(self.language(), key) {
            Some(text) => text.to_string(),
            None => {
                log::debug!("missing {} translation for {}", self.language().code(), key);
                humanize(key)
            }
        }
    }

    fn language(&self) -> Language {
        match self.language.read() {
            Ok(language) => *language,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
