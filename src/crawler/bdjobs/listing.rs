//! Search-result page parsing for BDJobs
//!
//! This module handles:
//! - Locating listing containers through an ordered selector chain
//! - Falling back to the containers of bare detail links
//! - Turning one listing container into a [`JobPosting`]

use crate::config::BdjobsConfig;
use crate::crawler::extract::{
    element_lines, element_text, find_by_class, first_match, labeled_text, mentions_remote,
    parse_posted_date, resolve_url, Extractor,
};
use crate::location::{Country, Location};
use crate::model::{JobPosting, Site};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use url::Url;

const SNIPPET_CHARS: usize = 200;

const TITLE_FALLBACKS: &[Extractor] = &[heading_text];
const COMPANY_CHAIN: &[Extractor] = &[company_by_class, company_by_label];
const LOCATION_CHAIN: &[Extractor] = &[location_by_class, location_by_label];

/// Parses one search-result page into postings, in page order
///
/// Containers that cannot be turned into a posting are logged and skipped.
/// An empty result means the page had no recognizable listings.
pub fn parse_listings(html: &str, base: &Url, config: &BdjobsConfig) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    let marker = config.detail_link_marker.to_lowercase();
    let candidates = find_listings(&document, &config.listing_selectors, &marker);

    candidates
        .iter()
        .filter_map(|card| {
            let posting = parse_card(card, base, &marker, &config.default_location);
            if posting.is_none() {
                tracing::debug!(
                    "Skipping BDJobs listing without a usable link: {}",
                    snippet(card)
                );
            }
            posting
        })
        .collect()
}

/// Finds listing containers: the first selector whose matches contain a
/// detail link wins, otherwise the nearest container of each detail link
pub fn find_listings<'a>(
    document: &'a Html,
    selectors: &[String],
    marker: &str,
) -> Vec<ElementRef<'a>> {
    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::debug!("Selector {} failed to parse: {:?}", raw, e);
                continue;
            }
        };

        let matches: Vec<ElementRef<'a>> = document
            .select(&selector)
            .filter(|element| detail_link(element, marker).is_some())
            .collect();

        if !matches.is_empty() {
            tracing::info!(
                "Found {} job elements using selector: {}",
                matches.len(),
                raw
            );
            return matches;
        }
    }

    let anchors = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let containers: Vec<ElementRef<'a>> = document
        .select(&anchors)
        .filter(|anchor| is_detail_href(anchor, marker))
        .filter_map(|anchor| nearest_container(&anchor))
        .collect();

    if !containers.is_empty() {
        tracing::info!("Fallback: found {} job links", containers.len());
    }
    containers
}

/// Builds a posting from one listing container
pub fn parse_card(
    card: &ElementRef<'_>,
    base: &Url,
    marker: &str,
    default_location: &str,
) -> Option<JobPosting> {
    let link = detail_link(card, marker).or_else(|| any_link(card))?;
    let job_url = resolve_url(link.value().attr("href")?, base)?;
    let id = derive_id(&job_url);

    let title = element_text(&link)
        .or_else(|| first_match(card, TITLE_FALLBACKS))
        .unwrap_or_else(|| "N/A".to_string());

    let company = first_match(card, COMPANY_CHAIN).unwrap_or_else(|| "N/A".to_string());
    let location_text =
        first_match(card, LOCATION_CHAIN).unwrap_or_else(|| default_location.to_string());

    let description = find_by_class(card, "div, p, span", &["desc", "summary"]);
    let job_type = find_by_class(card, "span, div", &["type"]);
    let date_posted =
        find_by_class(card, "span, div", &["date", "deadline"]).and_then(|t| parse_posted_date(&t));

    let is_remote = mentions_remote(&[
        title.as_str(),
        description.as_deref().unwrap_or_default(),
        location_text.as_str(),
    ]);

    let mut posting = JobPosting::new(id, title, job_url, Site::Bdjobs);
    posting.company_name = Some(company);
    posting.location = Some(Location::parse(&location_text, Country::Bangladesh));
    posting.description = description;
    posting.job_type = job_type;
    posting.date_posted = date_posted;
    posting.is_remote = Some(is_remote);
    Some(posting)
}

/// Stable posting id: the `id` query parameter when present, else a hash of
/// the URL, always prefixed with the site tag
///
/// # Examples
///
/// ```
/// use jobsweep::crawler::bdjobs::derive_id;
///
/// assert_eq!(
///     derive_id("https://jobs.bdjobs.com/jobdetails.asp?id=1234&ln=1"),
///     "bdjobs-1234"
/// );
/// assert!(derive_id("https://jobs.bdjobs.com/jobdetails/abc").starts_with("bdjobs-"));
/// ```
pub fn derive_id(job_url: &str) -> String {
    let from_query = Url::parse(job_url).ok().and_then(|url| {
        url.query_pairs()
            .find(|(key, _)| key.eq_ignore_ascii_case("id"))
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    });

    match from_query {
        Some(id) => format!("{}-{}", Site::Bdjobs, id),
        None => format!(
            "{}-{}",
            Site::Bdjobs,
            hex::encode(Sha256::digest(job_url.as_bytes()))
        ),
    }
}

fn is_detail_href(anchor: &ElementRef<'_>, marker: &str) -> bool {
    anchor
        .value()
        .attr("href")
        .map(|href| href.to_lowercase().contains(marker))
        .unwrap_or(false)
}

fn detail_link<'a>(element: &ElementRef<'a>, marker: &str) -> Option<ElementRef<'a>> {
    let anchors = Selector::parse("a[href]").ok()?;
    element
        .select(&anchors)
        .find(|anchor| is_detail_href(anchor, marker))
}

fn any_link<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let anchors = Selector::parse("a[href]").ok()?;
    element.select(&anchors).next()
}

/// Closest `tr`, `div` or `td` ancestor, else the direct parent element
fn nearest_container<'a>(anchor: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut ancestors = anchor.ancestors().filter_map(ElementRef::wrap);
    let parent = anchor.parent().and_then(ElementRef::wrap);
    ancestors
        .find(|el| matches!(el.value().name(), "tr" | "div" | "td"))
        .or(parent)
}

fn heading_text(card: &ElementRef<'_>) -> Option<String> {
    let headings = Selector::parse("h1, h2, h3, h4, strong, b").ok()?;
    card.select(&headings).find_map(|el| element_text(&el))
}

fn company_by_class(card: &ElementRef<'_>) -> Option<String> {
    find_by_class(card, "span, div, td, p", &["company", "employer", "org"])
}

fn company_by_label(card: &ElementRef<'_>) -> Option<String> {
    labeled_text(&element_lines(card), &["Company", "Organization", "Employer"])
}

fn location_by_class(card: &ElementRef<'_>) -> Option<String> {
    find_by_class(card, "span, div, td, p", &["location", "address", "place"])
}

fn location_by_label(card: &ElementRef<'_>) -> Option<String> {
    labeled_text(&element_lines(card), &["Location", "Address", "Place"])
}

fn snippet(card: &ElementRef<'_>) -> String {
    card.html().chars().take(SNIPPET_CHARS).collect()
}
