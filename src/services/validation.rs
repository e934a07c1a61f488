use url::Url;

use crate::entities::genres::Genres;
use crate::error::{AppError, AppResult};

/// US state codes accepted by the listing forms.
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const MIN_PHONE_DIGITS: usize = 7;

/// Collects every field problem so one response can report them all.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed value of a required text field.
    pub fn required(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.errors.push(format!("{field} is required"));
        }
        value.to_string()
    }

    pub fn state(&mut self, value: &str) -> String {
        let value = self.required("state", value).to_uppercase();
        if !value.is_empty() && !STATE_CODES.contains(&value.as_str()) {
            self.errors.push(format!("state '{value}' is not a US state code"));
        }
        value
    }

    pub fn phone(&mut self, value: Option<String>) -> Option<String> {
        let value = optional(value)?;
        let allowed = value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if !allowed || digits < MIN_PHONE_DIGITS {
            self.errors.push(format!("phone '{value}' is not a phone number"));
        }
        Some(value)
    }

    /// An absolute http(s) URL with a host.
    pub fn link(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = optional(value)?;
        match Url::parse(&value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
            Ok(url) => self.errors.push(format!(
                "{field} must be an http(s) URL, got scheme '{}'",
                url.scheme()
            )),
            Err(e) => self
                .errors
                .push(format!("{field} is not a valid URL: {e}")),
        }
        Some(value)
    }

    pub fn genres(&mut self, tags: Vec<String>) -> Genres {
        let tags: Vec<String> = tags.into_iter().map(|tag| tag.trim().to_string()).collect();
        if tags.is_empty() {
            self.errors.push("genres must name at least one genre".to_string());
        }
        for tag in tags.iter().filter(|tag| !Genres::is_choice(tag)) {
            self.errors.push(format!("genre '{tag}' is not a known genre"));
        }
        Genres::from(tags)
    }

    pub fn range(&mut self, field: &str, value: i32, min: i32, max: i32) -> i32 {
        if !(min..=max).contains(&value) {
            self.errors
                .push(format!("{field} must be between {min} and {max}"));
        }
        value
    }

    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors.join("; ")))
        }
    }
}

/// Blank optional strings are stored as NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
