use crate::location::Location;
use crate::model::row::{RawRow, RawValue};
use crate::model::Site;
use serde::{Deserialize, Serialize};

/// One normalized job listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Unique per site and listing, prefixed with the site tag
    pub id: String,
    pub title: String,
    pub company_name: Option<String>,
    /// Absolute URL of the listing; the de-duplication key across rounds
    pub job_url: String,
    pub location: Option<Location>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    /// ISO-8601 date when parseable, otherwise the site's own text
    pub date_posted: Option<String>,
    pub is_remote: Option<bool>,
    pub site: Site,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
}

impl JobPosting {
    pub fn new(id: String, title: String, job_url: String, site: Site) -> Self {
        Self {
            id,
            title,
            company_name: None,
            job_url,
            location: None,
            description: None,
            job_type: None,
            date_posted: None,
            is_remote: None,
            site,
            min_amount: None,
            max_amount: None,
            currency: None,
            interval: None,
        }
    }

    /// Converts the posting into a raw row, the normalizer's input shape
    pub fn to_row(&self) -> RawRow {
        fn text(value: &Option<String>) -> RawValue {
            value.clone().map(RawValue::Text).unwrap_or(RawValue::Null)
        }
        fn float(value: Option<f64>) -> RawValue {
            value.map(RawValue::Float).unwrap_or(RawValue::Null)
        }

        let mut row = RawRow::new();
        row.insert("id".into(), RawValue::Text(self.id.clone()));
        row.insert("title".into(), RawValue::Text(self.title.clone()));
        row.insert("company".into(), text(&self.company_name));
        row.insert("job_url".into(), RawValue::Text(self.job_url.clone()));
        row.insert(
            "location".into(),
            self.location
                .clone()
                .map(RawValue::Location)
                .unwrap_or(RawValue::Null),
        );
        row.insert("description".into(), text(&self.description));
        row.insert("job_type".into(), text(&self.job_type));
        row.insert("date_posted".into(), text(&self.date_posted));
        row.insert(
            "is_remote".into(),
            self.is_remote.map(RawValue::Bool).unwrap_or(RawValue::Null),
        );
        row.insert("site".into(), RawValue::Text(self.site.as_str().to_string()));
        row.insert("min_amount".into(), float(self.min_amount));
        row.insert("max_amount".into(), float(self.max_amount));
        row.insert("currency".into(), text(&self.currency));
        row.insert("interval".into(), text(&self.interval));
        row
    }
}
