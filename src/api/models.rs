use std::fmt;

use serde::Deserialize;

/// Body of a radius search response. A missing or null `searchResults` list
/// (as in error payloads) reads as no results.
#[derive(Debug, Default, Deserialize)]
pub struct RadiusSearchResponse {
    #[serde(rename = "searchResults", default)]
    pub search_results: Option<Vec<SearchResult>>,
}

impl RadiusSearchResponse {
    pub fn into_places(self) -> Vec<PlaceFact> {
        self.search_results
            .unwrap_or_default()
            .into_iter()
            .map(PlaceFact::from)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Option<SearchFields>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchFields {
    #[serde(default)]
    pub group_sic_code_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// A point of interest near a site, with display defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceFact {
    pub name: String,
    pub category: String,
    pub address: String,
    pub city: String,
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

impl From<SearchResult> for PlaceFact {
    fn from(result: SearchResult) -> Self {
        let fields = result.fields.unwrap_or_default();
        PlaceFact {
            name: result.name.unwrap_or_default().trim().to_string(),
            category: or_default(fields.group_sic_code_name, "no category"),
            address: or_default(fields.address, "no address"),
            city: or_default(fields.city, "no city"),
        }
    }
}

impl fmt::Display for PlaceFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}, {}", self.name, self.category, self.address, self.city)
    }
}
