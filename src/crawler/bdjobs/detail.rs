//! Detail-page enrichment for BDJobs postings

use crate::crawler::extract::{element_lines, element_text, mentions_remote, parse_salary, Salary};
use crate::model::JobPosting;
use scraper::{Html, Selector};

/// Description containers on a detail page, tried in order
const DESCRIPTION_SELECTORS: [&str; 4] = [
    "div.job-description",
    "div.job-details",
    "div[class*='desc']",
    "div[class*='detail']",
];

const CURRENCY: &str = "BDT";

/// Fields read from one posting's detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailInfo {
    pub description: Option<String>,
    pub salary: Option<Salary>,
}

impl DetailInfo {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.salary.is_none()
    }

    /// Copies the found fields onto a posting, leaving the rest untouched
    pub fn apply_to(self, posting: &mut JobPosting) {
        if let Some(description) = self.description {
            if mentions_remote(&[description.as_str()]) {
                posting.is_remote = Some(true);
            }
            posting.description = Some(description);
        }
        if let Some(salary) = self.salary {
            posting.min_amount = Some(salary.min_amount);
            posting.max_amount = Some(salary.max_amount);
            posting.currency = Some(salary.currency);
            posting.interval = salary.interval;
        }
    }
}

/// Parses a detail page body
pub fn parse_detail(html: &str) -> DetailInfo {
    let document = Html::parse_document(html);

    let description = DESCRIPTION_SELECTORS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .next()
            .as_ref()
            .and_then(element_text)
    });

    let page_text = element_lines(&document.root_element());
    let salary = parse_salary(&page_text, CURRENCY);

    DetailInfo {
        description,
        salary,
    }
}
