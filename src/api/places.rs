use reqwest::Url;
use tracing::{info, warn};

use crate::api::models::{PlaceFact, RadiusSearchResponse};
use crate::error::{AppError, Result};
use crate::fetch::HttpGet;
use crate::site::Site;

const RADIUS_MILES: &str = "10";
const MAX_MATCHES: &str = "10";

/// Looks up points of interest around a site's postal code. Responses are
/// not cached.
pub struct NearbyPlacesClient<H> {
    http: H,
    api_key: String,
    endpoint: Url,
}

impl<H: HttpGet> NearbyPlacesClient<H> {
    pub fn new(http: H, api_key: impl Into<String>, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AppError::ConfigError(format!("Invalid places endpoint: {}", e)))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint,
        })
    }

    /// Full request URL, key included. Do not log it.
    pub fn request_url(&self, site: &Site) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origin", site.postal_code())
            .append_pair("radius", RADIUS_MILES)
            .append_pair("maxMatches", MAX_MATCHES)
            .append_pair("ambiguities", "ignore")
            .append_pair("outFormat", "json")
            .append_pair("key", &self.api_key);
        url
    }

    /// An empty postal code is sent as-is; the API then answers with an error
    /// payload or no results.
    pub fn find_nearby(&self, site: &Site) -> Result<Vec<PlaceFact>> {
        info!(endpoint = %self.endpoint, origin = site.postal_code(), "Searching nearby places");
        let url = self.request_url(site);
        let response = self
            .http
            .get(url.as_str())
            .map_err(|e| self.redact(e, &url))?;
        if !response.is_success() {
            warn!(status = response.status, origin = site.postal_code(), "Places search returned an error status");
        }
        parse_places(&response.body)
    }
}

impl<H> NearbyPlacesClient<H> {
    /// Scrubs the request URL and the key out of a transport error message.
    fn redact(&self, err: AppError, url: &Url) -> AppError {
        match err {
            AppError::FetchError(msg) => {
                let mut msg = msg.replace(url.as_str(), self.endpoint.as_str());
                if !self.api_key.is_empty() {
                    msg = msg.replace(&self.api_key, "<redacted>");
                }
                AppError::FetchError(msg)
            }
            other => other,
        }
    }
}

pub fn parse_places(body: &str) -> Result<Vec<PlaceFact>> {
    let response: RadiusSearchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::PlacesError(format!("Invalid response format: {}", e)))?;
    Ok(response.into_places())
}
