//! Field extraction heuristics shared by the HTML crawlers
//!
//! Listing markup varies between pages and changes over time, so every field
//! is read through a prioritized list of extractors: the first one returning
//! a non-empty value wins. The helpers here are the building blocks of those
//! lists:
//! - Class-name keyword search over descendant elements
//! - Labeled-text regexes over a card's full text ("Company: ...")
//! - URL resolution against a site base URL
//! - Date, remote-flag and salary parsing

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

/// One step of a prioritized field extraction chain
pub type Extractor = fn(&ElementRef<'_>) -> Option<String>;

/// Accepted date formats for posting dates, tried in order
pub const DATE_FORMATS: [&str; 7] = [
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%d.%m.%Y",
];

/// Prefixes stripped from date text before parsing
const DATE_PREFIXES: [&str; 2] = ["Deadline:", "Posted:"];

/// Words marking a posting as remote
pub const REMOTE_KEYWORDS: [&str; 6] = [
    "remote",
    "work from home",
    "wfh",
    "home based",
    "virtual",
    "online",
];

/// Applies extractors in order, returning the first non-empty value
pub fn first_match(element: &ElementRef<'_>, extractors: &[Extractor]) -> Option<String> {
    extractors.iter().find_map(|extract| extract(element))
}

/// Text content of an element with whitespace collapsed; `None` when blank
pub fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Text content with one line per text node, for labeled-text regexes
pub fn element_lines(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds the first descendant whose tag is in `tags` and whose class
/// attribute contains a keyword, trying keywords in order
///
/// Matching is case-insensitive on the class attribute.
pub fn find_by_class(element: &ElementRef<'_>, tags: &str, keywords: &[&str]) -> Option<String> {
    let selector = Selector::parse(tags).ok()?;
    for keyword in keywords {
        let found = element.select(&selector).find(|candidate| {
            candidate
                .value()
                .attr("class")
                .map(|class| class.to_lowercase().contains(keyword))
                .unwrap_or(false)
        });
        if let Some(text) = found.as_ref().and_then(element_text) {
            return Some(text);
        }
    }
    None
}

/// Searches `text` for "Label: value" lines, trying labels in order
///
/// # Examples
///
/// ```
/// use jobsweep::crawler::extract::labeled_text;
///
/// let text = "Senior Engineer\nOrganization: Acme Ltd\nLocation: Dhaka";
/// assert_eq!(
///     labeled_text(text, &["Company", "Organization"]),
///     Some("Acme Ltd".to_string())
/// );
/// assert_eq!(labeled_text(text, &["Employer"]), None);
/// ```
pub fn labeled_text(text: &str, labels: &[&str]) -> Option<String> {
    for label in labels {
        let pattern = format!(r"(?i){}[:\s]+([^\n\r]+)", regex::escape(label));
        let re = Regex::new(&pattern).ok()?;
        if let Some(value) = re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
        {
            return Some(value);
        }
    }
    None
}

/// Resolves an href against the site base URL, keeping only http(s) results
pub fn resolve_url(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}

/// Normalizes a scraped date to ISO `YYYY-MM-DD` when it parses
///
/// Unparseable text is kept as-is (trimmed, prefixes removed); blank text
/// yields `None`.
pub fn parse_posted_date(text: &str) -> Option<String> {
    let mut cleaned = text.trim().to_string();
    for prefix in DATE_PREFIXES {
        cleaned = cleaned.replace(prefix, "");
    }
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .or_else(|| Some(cleaned.to_string()))
}

/// True if any of the texts mentions a remote-work keyword
pub fn mentions_remote(texts: &[&str]) -> bool {
    texts.iter().any(|text| {
        let lower = text.to_lowercase();
        REMOTE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    })
}

/// Salary range parsed from free text
#[derive(Debug, Clone, PartialEq)]
pub struct Salary {
    pub min_amount: f64,
    pub max_amount: f64,
    pub currency: String,
    pub interval: Option<String>,
}

/// Parses salary text such as "Salary: Tk. 30,000 - 45,000 (Monthly)"
///
/// The labeled forms (`Salary:`, `Compensation:`) are tried first, then bare
/// `BDT n` / `Tk n` amounts. Text without any number ("Negotiable") yields
/// `None`.
pub fn parse_salary(text: &str, currency: &str) -> Option<Salary> {
    let fragment = labeled_text(text, &["Salary", "Compensation"]).or_else(|| {
        let re = Regex::new(r"(?i)\b(?:BDT|Tk\.?)\s*(\d[\d,]*(?:\s*-\s*\d[\d,]*)?)").ok()?;
        re.captures(text)
            .and_then(|caps| caps.get(0))
            .map(|m| m.as_str().to_string())
    })?;

    let number = Regex::new(r"\d[\d,]*(?:\.\d+)?").ok()?;
    let amounts: Vec<f64> = number
        .find_iter(&fragment)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect();

    let min_amount = *amounts.first()?;
    let max_amount = amounts.get(1).copied().unwrap_or(min_amount);

    let lower = fragment.to_lowercase();
    let interval = if lower.contains("month") {
        Some("monthly".to_string())
    } else if lower.contains("year") || lower.contains("annual") {
        Some("yearly".to_string())
    } else if lower.contains("hour") {
        Some("hourly".to_string())
    } else {
        None
    };

    Some(Salary {
        min_amount,
        max_amount,
        currency: currency.to_string(),
        interval,
    })
}
