//! Turns nps.gov pages into a state index and per-state site lists.
//!
//! Every page goes through the `PageFetcher`, so the home page, state pages
//! and site pages are all served from the cache once seen. A cached home or
//! state page that no longer parses (an error page stored by an earlier run)
//! is fetched once more before giving up.

use reqwest::Url;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::fetch::{HttpGet, PageFetcher};
use crate::scraper::{parse_site_detail, parse_site_links, parse_state_index, StateIndex};
use crate::site::Site;

pub struct SiteCatalog<H> {
    fetcher: PageFetcher<H>,
    base: Url,
}

impl<H: HttpGet> SiteCatalog<H> {
    pub fn new(fetcher: PageFetcher<H>, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL {}: {}", base_url, e)))?;
        Ok(Self { fetcher, base })
    }

    pub fn fetcher(&self) -> &PageFetcher<H> {
        &self.fetcher
    }

    /// Fetches the home page and maps lower-cased state names to listing URLs.
    pub fn build_state_index(&mut self) -> Result<StateIndex> {
        let home = self.base.to_string();
        let index = self.fetch_navigation(&home, parse_state_index)?;
        debug!(states = index.len(), "Built state index");
        Ok(index)
    }

    /// Lists the sites of one state in page order. Sites whose detail page
    /// cannot be fetched or parsed are left out.
    pub fn list_sites_for_state(&mut self, state_url: &str) -> Result<Vec<Site>> {
        let links = self.fetch_navigation(state_url, parse_site_links)?;

        let mut sites = Vec::with_capacity(links.len());
        for link in links {
            match self.site_detail(&link) {
                Ok(site) => sites.push(site),
                Err(e) => warn!(url = %link, error = %e, "Skipping site"),
            }
        }
        Ok(sites)
    }

    fn fetch_navigation<T>(&mut self, url: &str, parse: fn(&str, &Url) -> Result<T>) -> Result<T> {
        let was_cached = self.fetcher.is_cached(url);
        let html = self.fetcher.fetch(url)?;
        match parse(&html, &self.base) {
            Err(AppError::ParseError(msg)) if was_cached => {
                warn!(url, error = %msg, "Cached page does not parse, refetching");
                let html = self.fetcher.refetch(url)?;
                parse(&html, &self.base)
            }
            other => other,
        }
    }

    pub fn site_detail(&mut self, site_url: &str) -> Result<Site> {
        let html = self.fetcher.fetch(site_url)?;
        parse_site_detail(&html).map_err(|e| match e {
            AppError::ParseError(msg) => AppError::ParseError(format!("{} ({})", msg, site_url)),
            other => other,
        })
    }
}
