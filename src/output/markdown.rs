//! Markdown report generation
//!
//! This module renders a search response as a human-readable markdown
//! report: the search parameters followed by one table row per posting.

use crate::output::response::SearchResponse;

/// Formats a search response as markdown
///
/// # Arguments
///
/// * `response` - The search response to render
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(response: &SearchResponse) -> String {
    let params = &response.search_params;
    let mut md = String::new();

    md.push_str("# Job Search Results\n\n");

    md.push_str("## Search\n\n");
    md.push_str(&format!("- **Keyword**: {}\n", params.search_keyword));
    md.push_str(&format!("- **Location**: {}\n", params.location));
    md.push_str(&format!("- **Results Wanted**: {}\n", params.results_wanted));
    if let Some(hours) = params.hours_old {
        md.push_str(&format!("- **Posted Within**: {} hours\n", hours));
    }
    if let Some(remote) = params.is_remote {
        md.push_str(&format!(
            "- **Work Mode**: {}\n",
            if remote { "remote" } else { "on-site" }
        ));
    }
    md.push_str(&format!("- **Generated**: {}\n\n", response.timestamp));

    md.push_str(&format!("{}\n\n", response.message));

    if response.jobs.is_empty() {
        return md;
    }

    md.push_str("## Postings\n\n");
    md.push_str("| # | Title | Company | Location | Site | Posted |\n");
    md.push_str("|---|-------|---------|----------|------|--------|\n");

    for (index, job) in response.jobs.iter().enumerate() {
        let title = if job.job_url.is_empty() {
            cell(&job.title)
        } else {
            format!("[{}]({})", cell(&job.title), job.job_url)
        };
        let location = job
            .location
            .as_ref()
            .map(|l| l.display())
            .unwrap_or_default();

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            index + 1,
            title,
            cell(job.company_name.as_deref().unwrap_or("")),
            cell(&location),
            job.site,
            cell(job.date_posted.as_deref().unwrap_or("")),
        ));
    }
    md.push('\n');

    md
}

/// Escapes a value for use inside a table cell
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Country, Location};
    use crate::model::{JobPosting, SearchRequest, Site};

    fn create_test_response() -> SearchResponse {
        let mut job = JobPosting::new(
            "bdjobs-1".to_string(),
            "Engineer | Backend".to_string(),
            "https://jobs.bdjobs.com/jobdetails.asp?id=1".to_string(),
            Site::Bdjobs,
        );
        job.company_name = Some("Acme".to_string());
        job.location = Some(Location::parse("Dhaka", Country::Bangladesh));
        job.date_posted = Some("2024-01-15".to_string());

        let request = SearchRequest::new("engineer", "Dhaka", 5)
            .unwrap()
            .with_remote(Some(false));
        SearchResponse::from_results(&request, vec![job])
    }

    #[test]
    fn test_format_markdown_report() {
        let markdown = format_markdown_report(&create_test_response());

        assert!(markdown.contains("# Job Search Results"));
        assert!(markdown.contains("- **Keyword**: engineer"));
        assert!(markdown.contains("- **Work Mode**: on-site"));
        assert!(markdown.contains("Successfully found 1 jobs"));
        assert!(markdown.contains(
            "| 1 | [Engineer \\| Backend](https://jobs.bdjobs.com/jobdetails.asp?id=1) | Acme | Dhaka, Bangladesh | bdjobs | 2024-01-15 |"
        ));
    }

    #[test]
    fn test_markdown_without_jobs() {
        let request = SearchRequest::new("engineer", "Rajshahi", 5).unwrap();
        let markdown = format_markdown_report(&SearchResponse::from_results(&request, Vec::new()));

        assert!(markdown.contains("No jobs found"));
        assert!(!markdown.contains("## Postings"));
    }
}
