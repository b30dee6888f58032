use crate::config::MAX_RESULTS_CAP;
use crate::RequestError;
use serde::Serialize;

/// One search call: immutable once constructed
///
/// Derived requests (a different result count, a recency filter) are built
/// with the `with_*` methods, which return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    search_term: String,
    location: String,
    results_wanted: usize,
    hours_old: Option<u32>,
    is_remote: Option<bool>,
    country_hint: String,
    /// Leading postings each crawler skips; later fetch rounds start past
    /// what earlier rounds already returned
    offset: usize,
}

impl SearchRequest {
    /// Creates a validated request
    ///
    /// # Errors
    ///
    /// * `RequestError::EmptySearchTerm` - the term is blank
    /// * `RequestError::ResultsOutOfRange` - `results_wanted` is not in `1..=200`
    pub fn new(
        search_term: impl Into<String>,
        location: impl Into<String>,
        results_wanted: usize,
    ) -> Result<Self, RequestError> {
        let search_term = search_term.into().trim().to_string();
        if search_term.is_empty() {
            return Err(RequestError::EmptySearchTerm);
        }
        check_results_wanted(results_wanted)?;

        Ok(Self {
            search_term,
            location: location.into().trim().to_string(),
            results_wanted,
            hours_old: None,
            is_remote: None,
            country_hint: String::new(),
            offset: 0,
        })
    }

    pub fn with_hours_old(mut self, hours_old: Option<u32>) -> Self {
        self.hours_old = hours_old;
        self
    }

    pub fn with_remote(mut self, is_remote: Option<bool>) -> Self {
        self.is_remote = is_remote;
        self
    }

    pub fn with_country_hint(mut self, country_hint: impl Into<String>) -> Self {
        self.country_hint = country_hint.into();
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Copy of this request asking for a different number of postings
    pub fn with_results_wanted(&self, results_wanted: usize) -> Result<Self, RequestError> {
        check_results_wanted(results_wanted)?;
        let mut request = self.clone();
        request.results_wanted = results_wanted;
        Ok(request)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn results_wanted(&self) -> usize {
        self.results_wanted
    }

    pub fn hours_old(&self) -> Option<u32> {
        self.hours_old
    }

    pub fn is_remote(&self) -> Option<bool> {
        self.is_remote
    }

    pub fn country_hint(&self) -> &str {
        &self.country_hint
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

fn check_results_wanted(results_wanted: usize) -> Result<(), RequestError> {
    if results_wanted < 1 || results_wanted > MAX_RESULTS_CAP {
        return Err(RequestError::ResultsOutOfRange {
            got: results_wanted,
            max: MAX_RESULTS_CAP,
        });
    }
    Ok(())
}
