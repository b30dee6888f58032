//! Core data model: sites, search requests, postings, and raw scraped rows

mod posting;
mod request;
mod row;
mod site;

pub use posting::JobPosting;
pub use request::SearchRequest;
pub use row::{row_from_json, RawRow, RawValue};
pub use site::Site;
