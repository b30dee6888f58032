//! Location handling for jobsweep
//!
//! This module maps free-text locations to countries, decides whether a
//! region-restricted crawler applies to a search, and parses listing
//! location text into structured [`Location`] values.

mod keywords;
mod parse;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use keywords::{match_region, matches_keyword, REGIONS};

/// Countries known to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Bangladesh,
    India,
    Pakistan,
    Usa,
    Canada,
    Uk,
    Australia,
    Germany,
    France,
    Uae,
    Qatar,
    Saudi,
    Kuwait,
    Bahrain,
    Oman,
}

impl Country {
    pub const ALL: [Country; 15] = [
        Country::Bangladesh,
        Country::India,
        Country::Pakistan,
        Country::Usa,
        Country::Canada,
        Country::Uk,
        Country::Australia,
        Country::Germany,
        Country::France,
        Country::Uae,
        Country::Qatar,
        Country::Saudi,
        Country::Kuwait,
        Country::Bahrain,
        Country::Oman,
    ];

    /// Lower-case code used in configuration and on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bangladesh => "bangladesh",
            Self::India => "india",
            Self::Pakistan => "pakistan",
            Self::Usa => "usa",
            Self::Canada => "canada",
            Self::Uk => "uk",
            Self::Australia => "australia",
            Self::Germany => "germany",
            Self::France => "france",
            Self::Uae => "uae",
            Self::Qatar => "qatar",
            Self::Saudi => "saudi",
            Self::Kuwait => "kuwait",
            Self::Bahrain => "bahrain",
            Self::Oman => "oman",
        }
    }

    /// Human-readable country name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bangladesh => "Bangladesh",
            Self::India => "India",
            Self::Pakistan => "Pakistan",
            Self::Usa => "USA",
            Self::Canada => "Canada",
            Self::Uk => "UK",
            Self::Australia => "Australia",
            Self::Germany => "Germany",
            Self::France => "France",
            Self::Uae => "UAE",
            Self::Qatar => "Qatar",
            Self::Saudi => "Saudi Arabia",
            Self::Kuwait => "Kuwait",
            Self::Bahrain => "Bahrain",
            Self::Oman => "Oman",
        }
    }

    /// Looks a country up by its code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Country> {
        let code = code.trim().to_lowercase();
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A structured location derived heuristically from free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Country,
}

impl Location {
    /// Renders the location as "City, State, Country", skipping missing parts
    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(city) = &self.city {
            parts.push(city);
        }
        if let Some(state) = &self.state {
            parts.push(state);
        }
        parts.push(self.country.display_name());
        parts.join(", ")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Outcome of classifying a search location for one crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the crawler should run at all
    pub applicable: bool,

    /// Country the location maps to (the default when nothing matched)
    pub country: Country,
}

impl Classification {
    /// Country code of the classified location
    pub fn country_code(&self) -> &'static str {
        self.country.code()
    }
}

/// Maps location text to countries and crawler applicability
#[derive(Debug, Clone, Copy)]
pub struct LocationClassifier {
    default_country: Country,
}

impl LocationClassifier {
    pub fn new(default_country: Country) -> Self {
        Self { default_country }
    }

    /// Builds a classifier from a configured country code, falling back to USA
    pub fn from_code(code: &str) -> Self {
        Self::new(Country::from_code(code).unwrap_or(Country::Usa))
    }

    pub fn default_country(&self) -> Country {
        self.default_country
    }

    /// Returns the country a location text maps to
    pub fn country_of(&self, location: &str) -> Country {
        match_region(location).unwrap_or(self.default_country)
    }

    /// Classifies a location for a crawler restricted to `region`
    ///
    /// An unrestricted crawler (`region == None`) applies everywhere. A
    /// restricted crawler applies only when the location matches its region,
    /// or when the location is blank ("unspecified").
    ///
    /// # Examples
    ///
    /// ```
    /// use jobsweep::location::{Country, LocationClassifier};
    ///
    /// let classifier = LocationClassifier::new(Country::Usa);
    /// let dhaka = classifier.classify("Dhaka", Some(Country::Bangladesh));
    /// assert!(dhaka.applicable);
    /// assert_eq!(dhaka.country_code(), "bangladesh");
    ///
    /// let paris = classifier.classify("Paris", Some(Country::Bangladesh));
    /// assert!(!paris.applicable);
    /// ```
    pub fn classify(&self, location: &str, region: Option<Country>) -> Classification {
        let matched = match_region(location);
        let country = matched.unwrap_or(self.default_country);

        let applicable = match region {
            None => true,
            Some(_) if location.trim().is_empty() => true,
            Some(restricted) => matched == Some(restricted),
        };

        Classification {
            applicable,
            country,
        }
    }
}

impl Default for LocationClassifier {
    fn default() -> Self {
        Self::new(Country::Usa)
    }
}
