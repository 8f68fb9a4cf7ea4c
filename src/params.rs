use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

// Date format used by the supplier API
pub const SUPPLIER_DATE_FORMAT: &str = "%d/%m/%Y";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a single flight search.
///
/// `fly_to` carries the caller's raw comma-separated airport pair. Once the
/// pair has been validated, `fly_from` holds the sanitized codes joined by a
/// comma and is what the supplier search receives as origin.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub fly_from: String,
    pub fly_to: String,
    pub currency: String,
    pub date_from: String,
    pub date_to: String,
}

impl SearchParams {
    pub fn new(
        fly_to: impl Into<String>,
        currency: impl Into<String>,
        date_from: impl Into<String>,
        date_to: impl Into<String>,
    ) -> Self {
        Self {
            fly_from: String::new(),
            fly_to: fly_to.into(),
            currency: currency.into(),
            date_from: date_from.into(),
            date_to: date_to.into(),
        }
    }

    pub fn with_fly_from(mut self, fly_from: impl Into<String>) -> Self {
        self.fly_from = fly_from.into();
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    // Returns (date_from, date_to) in canonical form
    pub fn normalized_dates(&self) -> Result<(NaiveDate, NaiveDate), SearchError> {
        Ok((normalize_date(&self.date_from)?, normalize_date(&self.date_to)?))
    }
}

/// Parses a date in the supplier's `dd/mm/yyyy` format, also accepting dates
/// that are already ISO formatted.
pub fn normalize_date(value: &str) -> Result<NaiveDate, SearchError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, SUPPLIER_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|e| SearchError::InvalidDate {
            value: value.to_string(),
            source: e,
        })
}
