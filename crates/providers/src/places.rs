use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Extracts place names from free-form itinerary text, in first-occurrence
/// order with duplicates preserved.
pub trait PlaceExtractor: Send + Sync {
    fn extract_places(&self, text: &str) -> Vec<String>;
}

/// Geopolitical entities only: cities, regions, countries. Facilities and
/// landmarks ("Amber Fort", "Vatican Museum") are deliberately not listed, so
/// they never become waypoints; widen coverage with [`GazetteerExtractor::with_extra_places`].
const GPE_GAZETTEER: &[&str] = &[
    // Indian cities
    "Jaipur", "Delhi", "New Delhi", "Mumbai", "Chennai", "Kolkata", "Bengaluru", "Hyderabad",
    "Agra", "Udaipur", "Jodhpur", "Jaisalmer", "Varanasi", "Amritsar", "Pune", "Kochi", "Mysuru",
    "Shimla", "Manali", "Leh", "Darjeeling", "Rishikesh", "Haridwar", "Pushkar", "Ajmer",
    // Indian states and regions
    "Rajasthan", "Kerala", "Goa", "Punjab", "Himachal Pradesh", "Tamil Nadu", "Uttar Pradesh",
    "Maharashtra", "Karnataka", "West Bengal", "Ladakh", "Sikkim", "Assam",
    // Europe
    "London", "Edinburgh", "Dublin", "Paris", "Lyon", "Nice", "Rome", "Florence", "Venice",
    "Milan", "Naples", "Madrid", "Barcelona", "Seville", "Granada", "Lisbon", "Porto",
    "Amsterdam", "Brussels", "Berlin", "Munich", "Hamburg", "Vienna", "Prague", "Budapest",
    "Athens", "Santorini", "Istanbul", "Zurich", "Geneva", "Copenhagen", "Stockholm", "Oslo",
    "Helsinki", "Reykjavik", "Warsaw", "Krakow", "Oxford", "Cambridge",
    // Middle East and Africa
    "Dubai", "Abu Dhabi", "Doha", "Muscat", "Amman", "Cairo", "Luxor", "Marrakesh", "Fes",
    "Cape Town", "Nairobi", "Zanzibar",
    // Asia-Pacific
    "Tokyo", "Kyoto", "Osaka", "Seoul", "Busan", "Beijing", "Shanghai", "Hong Kong", "Taipei",
    "Singapore", "Bangkok", "Chiang Mai", "Phuket", "Hanoi", "Ho Chi Minh City", "Kuala Lumpur",
    "Jakarta", "Bali", "Kathmandu", "Colombo", "Sydney", "Melbourne", "Auckland", "Queenstown",
    // Americas
    "New York", "Boston", "Chicago", "San Francisco", "Los Angeles", "Seattle", "Miami",
    "New Orleans", "Toronto", "Vancouver", "Montreal", "Mexico City", "Havana", "Lima", "Cusco",
    "Santiago", "Buenos Aires", "Rio de Janeiro", "Sao Paulo",
    // Countries
    "India", "Nepal", "Bhutan", "Sri Lanka", "Maldives", "France", "Italy", "Spain", "Portugal",
    "Germany", "Austria", "Switzerland", "Netherlands", "Belgium", "Greece", "Turkey", "Egypt",
    "Morocco", "Kenya", "Tanzania", "Japan", "China", "Thailand", "Vietnam", "Malaysia",
    "Indonesia", "Singapore", "Australia", "England", "Scotland", "Ireland", "Canada", "Mexico",
    "Peru", "Chile", "Argentina", "Brazil", "United Kingdom", "United States", "New Zealand",
    "South Africa", "South Korea", "United Arab Emirates",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z'\-]*").expect("static regex"));

/// Longest span the matcher will consider, in words ("Ho Chi Minh City").
const MAX_SPAN_WORDS: usize = 4;

/// Gazetteer-backed place recognizer: capitalized word spans are matched
/// (longest first) against a set of known geopolitical names. Deterministic
/// and dependency-free where a statistical NER tagger would be; the recall
/// trade-off is recorded in DESIGN.md.
#[derive(Debug, Clone)]
pub struct GazetteerExtractor {
    entries: HashSet<String>,
}

impl Default for GazetteerExtractor {
    fn default() -> Self {
        Self {
            entries: GPE_GAZETTEER
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
        }
    }
}

impl GazetteerExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds caller-supplied place names on top of the built-in gazetteer.
    pub fn with_extra_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for place in places {
            self.entries.insert(place.as_ref().to_lowercase());
        }
        self
    }

    fn lookup(&self, words: &[&str]) -> bool {
        self.entries.contains(&words.join(" ").to_lowercase())
    }
}

impl PlaceExtractor for GazetteerExtractor {
    fn extract_places(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();
        let mut found = Vec::new();
        let mut index = 0;

        while index < words.len() {
            let mut advanced = false;

            // Longest match first, so "New Delhi" is not reported as "Delhi".
            for span in (1..=MAX_SPAN_WORDS.min(words.len() - index)).rev() {
                let candidate = &words[index..index + span];
                let capitalized = candidate
                    .iter()
                    .all(|word| word.chars().next().is_some_and(char::is_uppercase));

                if capitalized && self.lookup(candidate) {
                    found.push(candidate.join(" "));
                    index += span;
                    advanced = true;
                    break;
                }
            }

            if !advanced {
                index += 1;
            }
        }

        found
    }
}
