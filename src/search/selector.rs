use crate::crawler::SiteCrawler;
use crate::model::Site;

/// Chooses the sites to run for a search location
///
/// Region-restricted crawlers that apply to `location` come first, in
/// registration order, followed by the baseline sites. The result has no
/// duplicates and is identical for identical input.
pub fn select_sites(
    location: &str,
    baseline: &[Site],
    crawlers: &[Box<dyn SiteCrawler>],
) -> Vec<Site> {
    let regional = crawlers
        .iter()
        .filter(|crawler| crawler.region().is_some() && crawler.applicable(location))
        .map(|crawler| crawler.site());

    let mut selected: Vec<Site> = Vec::new();
    for site in regional.chain(baseline.iter().copied()) {
        if !selected.contains(&site) {
            selected.push(site);
        }
    }
    selected
}
