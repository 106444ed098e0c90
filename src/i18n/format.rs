//! Locale-aware formatting helpers

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::Language;

static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// Readable label from a translation key: `leafyGreens` -> `Leafy Greens`
pub fn humanize(key: &str) -> String {
    let with_spaces = CAMEL_BOUNDARY.replace_all(key, "$1 $2");
    let mut chars = with_spaces.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn localize_digits(text: &str, language: Language) -> String {
    match language {
        Language::En => text.to_string(),
        Language::Ar => text
            .chars()
            .map(|c| match c {
                '0'..='9' => char::from_u32('٠' as u32 + (c as u32 - '0' as u32)).unwrap_or(c),
                ',' => '٬',
                '.' => '٫',
                other => other,
            })
            .collect(),
    }
}

/// Grouped amount with at most two fraction digits: `1500.5` -> `1,500.5`
pub fn format_amount(value: f64, language: Language) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let mut text = String::new();
    if negative && cents > 0 {
        text.push('-');
    }
    text.push_str(&grouped);
    if fraction > 0 {
        let digits = format!("{:02}", fraction);
        text.push('.');
        text.push_str(digits.trim_end_matches('0'));
    }

    localize_digits(&text, language)
}

/// Short date: `M/D/YYYY` in English, `D/M/YYYY` in Arabic
pub fn format_date(date: &DateTime<Utc>, language: Language) -> String {
    let text = match language {
        Language::En => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Language::Ar => format!("{}/{}/{}", date.day(), date.month(), date.year()),
    };
    localize_digits(&text, language)
}
