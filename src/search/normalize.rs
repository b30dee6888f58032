//! Result normalization: heterogeneous raw rows into canonical postings
//!
//! Every field is coerced independently. Missing values (null or NaN) take
//! the field's default; values of the wrong shape fail the whole row, which
//! is logged and skipped without affecting the rest of the batch.

use crate::crawler::extract::parse_posted_date;
use crate::location::{Location, LocationClassifier};
use crate::model::{JobPosting, RawRow, RawValue, Site};
use thiserror::Error;

/// Sentinel for required text fields with no value
pub const NOT_AVAILABLE: &str = "N/A";

/// Why a single row could not be normalized
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("field '{field}' expected {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("field '{field}' is not a boolean: '{value}'")]
    InvalidBool { field: &'static str, value: String },
}

/// Converts raw rows into postings, country-tagging text locations
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    classifier: LocationClassifier,
}

impl Normalizer {
    pub fn new(classifier: LocationClassifier) -> Self {
        Self { classifier }
    }

    /// Normalizes a batch, skipping (and logging) rows that fail
    pub fn normalize(&self, rows: &[RawRow]) -> Vec<JobPosting> {
        rows.iter()
            .filter_map(|row| match self.normalize_row(row) {
                Ok(posting) => Some(posting),
                Err(e) => {
                    tracing::error!("Error processing job row: {}", e);
                    tracing::debug!("Problematic row data: {:?}", row);
                    None
                }
            })
            .collect()
    }

    /// Normalizes one row
    ///
    /// # Errors
    ///
    /// Returns a `NormalizeError` when a present value has a shape its field
    /// cannot take.
    pub fn normalize_row(&self, row: &RawRow) -> Result<JobPosting, NormalizeError> {
        let id = text(row, "id")?.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let title = text(row, "title")?.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let company = match text(row, "company")? {
            Some(company) => Some(company),
            None => text(row, "company_name")?,
        };
        let job_url = text(row, "job_url")?.unwrap_or_default();
        let site = text(row, "site")?
            .and_then(|s| s.parse::<Site>().ok())
            .unwrap_or(Site::Unknown);

        let mut posting = JobPosting::new(id, title, job_url, site);
        posting.company_name = Some(company.unwrap_or_else(|| NOT_AVAILABLE.to_string()));
        posting.location = self.location(row)?;
        posting.description = text(row, "description")?;
        posting.job_type = text(row, "job_type")?;
        posting.date_posted = date(row, "date_posted")?;
        posting.is_remote = Some(boolean(row, "is_remote")?.unwrap_or(false));
        posting.min_amount = number(row, "min_amount")?;
        posting.max_amount = number(row, "max_amount")?;
        posting.currency = text(row, "currency")?;
        posting.interval = text(row, "interval")?;
        Ok(posting)
    }

    fn location(&self, row: &RawRow) -> Result<Option<Location>, NormalizeError> {
        match present(row, "location") {
            None => Ok(None),
            Some(RawValue::Location(location)) => Ok(Some(location.clone())),
            Some(RawValue::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RawValue::Text(text)) => Ok(Some(Location::parse(
                text,
                self.classifier.country_of(text),
            ))),
            Some(other) => Err(wrong_type("location", "location or text", other)),
        }
    }
}

/// The value under `key`, treating null and NaN as absent
fn present<'a>(row: &'a RawRow, key: &str) -> Option<&'a RawValue> {
    row.get(key).filter(|value| !value.is_missing())
}

fn wrong_type(field: &'static str, expected: &'static str, found: &RawValue) -> NormalizeError {
    NormalizeError::WrongType {
        field,
        expected,
        found: found.kind(),
    }
}

fn text(row: &RawRow, field: &'static str) -> Result<Option<String>, NormalizeError> {
    match present(row, field) {
        None => Ok(None),
        Some(RawValue::Text(s)) => Ok(Some(s.clone())),
        Some(RawValue::Int(i)) => Ok(Some(i.to_string())),
        Some(RawValue::Float(f)) => Ok(Some(f.to_string())),
        Some(RawValue::Date(d)) => Ok(Some(d.format("%Y-%m-%d").to_string())),
        Some(RawValue::DateTime(dt)) => Ok(Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
        Some(other) => Err(wrong_type(field, "text", other)),
    }
}

fn date(row: &RawRow, field: &'static str) -> Result<Option<String>, NormalizeError> {
    match present(row, field) {
        None => Ok(None),
        Some(RawValue::Date(d)) => Ok(Some(d.format("%Y-%m-%d").to_string())),
        Some(RawValue::DateTime(dt)) => Ok(Some(dt.date().format("%Y-%m-%d").to_string())),
        Some(RawValue::Text(s)) => Ok(parse_posted_date(s)),
        Some(other) => Err(wrong_type(field, "date or text", other)),
    }
}

fn boolean(row: &RawRow, field: &'static str) -> Result<Option<bool>, NormalizeError> {
    match present(row, field) {
        None => Ok(None),
        Some(RawValue::Bool(b)) => Ok(Some(*b)),
        Some(RawValue::Int(0)) => Ok(Some(false)),
        Some(RawValue::Int(1)) => Ok(Some(true)),
        Some(RawValue::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" | "" => Ok(Some(false)),
            _ => Err(NormalizeError::InvalidBool {
                field,
                value: s.clone(),
            }),
        },
        Some(RawValue::Int(i)) => Err(NormalizeError::InvalidBool {
            field,
            value: i.to_string(),
        }),
        Some(other) => Err(wrong_type(field, "bool", other)),
    }
}

fn number(row: &RawRow, field: &'static str) -> Result<Option<f64>, NormalizeError> {
    match present(row, field) {
        None => Ok(None),
        Some(RawValue::Float(f)) => Ok(Some(*f)),
        Some(RawValue::Int(i)) => Ok(Some(*i as f64)),
        Some(RawValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawValue::Text(s)) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| NormalizeError::InvalidNumber {
                field,
                value: s.clone(),
            }),
        Some(other) => Err(wrong_type(field, "number", other)),
    }
}
