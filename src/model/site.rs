use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a job board; used both to dispatch to a crawler and to tag results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Linkedin,
    Indeed,
    Glassdoor,
    Bdjobs,
    /// Placeholder for normalized rows that carry no recognizable site
    Unknown,
}

impl Site {
    /// Lower-case tag, also the prefix of derived posting ids
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Indeed => "indeed",
            Self::Glassdoor => "glassdoor",
            Self::Bdjobs => "bdjobs",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(Self::Linkedin),
            "indeed" => Ok(Self::Indeed),
            "glassdoor" => Ok(Self::Glassdoor),
            "bdjobs" => Ok(Self::Bdjobs),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown site '{}'", other)),
        }
    }
}
