//! Output module for rendering search responses
//!
//! This module handles:
//! - Composing the caller-facing [`SearchResponse`]
//! - Rendering it as JSON or as a markdown report
//! - Writing the rendered output to stdout or a file

mod markdown;
mod response;

pub use markdown::format_markdown_report;
pub use response::{SearchParams, SearchResponse};

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while rendering or writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Rendering format for a search response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

/// Renders a response in the given format
pub fn render(response: &SearchResponse, format: Format) -> OutputResult<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(response)
            .map_err(|e| OutputError::Format(e.to_string())),
        Format::Markdown => Ok(format_markdown_report(response)),
    }
}

/// Renders a response and writes it to `output_path`, or stdout when `None`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the response
/// * `Err(OutputError)` - Failed to render or write
pub fn write_response(
    response: &SearchResponse,
    format: Format,
    output_path: Option<&Path>,
) -> OutputResult<()> {
    let mut rendered = render(response, format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match output_path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
        }
    }

    Ok(())
}
