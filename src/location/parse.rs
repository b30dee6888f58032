use crate::location::{Country, Location};

impl Location {
    /// Parses listing location text such as "Gulshan, Dhaka" into a Location
    ///
    /// The first comma-separated part becomes the city and the second the
    /// state. A trailing part naming the country itself is dropped, so
    /// "Dhaka, Bangladesh" yields city "Dhaka" with no state. Blank text
    /// yields a country-only location.
    ///
    /// # Examples
    ///
    /// ```
    /// use jobsweep::location::{Country, Location};
    ///
    /// let loc = Location::parse("Mirpur, Dhaka", Country::Bangladesh);
    /// assert_eq!(loc.city.as_deref(), Some("Mirpur"));
    /// assert_eq!(loc.state.as_deref(), Some("Dhaka"));
    /// ```
    pub fn parse(text: &str, country: Country) -> Location {
        let mut parts: Vec<&str> = text
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() > 1 {
            if let Some(last) = parts.last() {
                if names_country(last, country) {
                    parts.pop();
                }
            }
        }

        Location {
            city: parts.first().map(|s| s.to_string()),
            state: parts.get(1).map(|s| s.to_string()),
            country,
        }
    }
}

fn names_country(part: &str, country: Country) -> bool {
    part.eq_ignore_ascii_case(country.code()) || part.eq_ignore_ascii_case(country.display_name())
}
