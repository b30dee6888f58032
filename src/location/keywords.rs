use crate::location::Country;

/// Region keyword table, checked in order; the first region with a matching
/// keyword wins.
pub const REGIONS: &[(Country, &[&str])] = &[
    (
        Country::Bangladesh,
        &[
            "bangladesh",
            "dhaka",
            "chittagong",
            "chattogram",
            "sylhet",
            "rajshahi",
            "khulna",
            "barisal",
            "rangpur",
            "mymensingh",
            "comilla",
            "narayanganj",
            "gazipur",
            "bd",
        ],
    ),
    (
        Country::India,
        &[
            "india",
            "mumbai",
            "delhi",
            "bangalore",
            "bengaluru",
            "hyderabad",
            "chennai",
            "kolkata",
            "pune",
            "ahmedabad",
            "jaipur",
            "surat",
            "lucknow",
            "kanpur",
            "nagpur",
            "indore",
            "thane",
            "bhopal",
            "visakhapatnam",
        ],
    ),
    (
        Country::Pakistan,
        &[
            "pakistan",
            "karachi",
            "lahore",
            "islamabad",
            "rawalpindi",
            "faisalabad",
        ],
    ),
    (
        Country::Usa,
        &[
            "usa",
            "united states",
            "america",
            "us",
            "new york",
            "california",
            "texas",
            "florida",
            "chicago",
            "los angeles",
            "san francisco",
            "seattle",
            "boston",
            "atlanta",
            "denver",
            "phoenix",
            "philadelphia",
            "houston",
            "dallas",
            "miami",
            "washington",
            "las vegas",
            "detroit",
            "minneapolis",
            "portland",
            "san diego",
        ],
    ),
    (
        Country::Canada,
        &[
            "canada",
            "toronto",
            "vancouver",
            "montreal",
            "calgary",
            "ottawa",
            "edmonton",
            "winnipeg",
            "quebec",
            "hamilton",
        ],
    ),
    (
        Country::Uk,
        &[
            "uk",
            "united kingdom",
            "england",
            "london",
            "manchester",
            "birmingham",
            "glasgow",
            "edinburgh",
            "liverpool",
            "bristol",
            "leeds",
            "sheffield",
            "cardiff",
            "belfast",
        ],
    ),
    (
        Country::Australia,
        &[
            "australia",
            "sydney",
            "melbourne",
            "brisbane",
            "perth",
            "adelaide",
            "canberra",
        ],
    ),
    (
        Country::Germany,
        &[
            "germany",
            "berlin",
            "munich",
            "hamburg",
            "cologne",
            "frankfurt",
            "stuttgart",
            "düsseldorf",
            "dortmund",
            "essen",
        ],
    ),
    (
        Country::France,
        &[
            "france",
            "paris",
            "lyon",
            "marseille",
            "toulouse",
            "nice",
            "nantes",
            "strasbourg",
            "montpellier",
            "bordeaux",
        ],
    ),
    (Country::Uae, &["uae", "dubai", "abu dhabi", "sharjah"]),
    (Country::Qatar, &["qatar", "doha"]),
    (Country::Saudi, &["saudi arabia", "saudi", "riyadh", "jeddah"]),
    (Country::Kuwait, &["kuwait"]),
    (Country::Bahrain, &["bahrain"]),
    (Country::Oman, &["oman", "muscat"]),
];

/// Keywords this short only match whole tokens ("us" must not match "austin")
const TOKEN_MATCH_MAX_LEN: usize = 3;

/// Checks if a lower-cased location text contains a region keyword
///
/// Keywords longer than three characters match anywhere in the text;
/// shorter ones must appear as a whole alphanumeric token.
///
/// # Examples
///
/// ```
/// use jobsweep::location::matches_keyword;
///
/// assert!(matches_keyword("dhaka", "gulshan, dhaka"));
/// assert!(matches_keyword("us", "remote, us"));
/// assert!(!matches_keyword("us", "austin, texas"));
/// ```
pub fn matches_keyword(keyword: &str, text: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    if keyword.chars().count() <= TOKEN_MATCH_MAX_LEN {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|token| token == keyword)
    } else {
        text.contains(keyword)
    }
}

/// Returns the first region whose keyword list matches the text
pub fn match_region(text: &str) -> Option<Country> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    REGIONS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| matches_keyword(k, &lowered)))
        .map(|(country, _)| *country)
}
