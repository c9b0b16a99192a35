//! HTML extraction for nps.gov pages. Pure functions over page bodies; no I/O.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::site::Site;

/// Lower-cased state name -> absolute URL of the state's listing page.
pub type StateIndex = BTreeMap<String, String>;

// Create static selectors to avoid recompiling them each time
static STATE_MENU: Lazy<Selector> = Lazy::new(|| selector("ul.dropdown-menu.SearchBar-keywordSearch"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
static PARK_LIST: Lazy<Selector> = Lazy::new(|| selector("#list_parks"));
static PARK_ENTRY: Lazy<Selector> =
    Lazy::new(|| selector(".col-md-9.col-sm-9.col-xs-12.table-cell.list_left"));
static TITLE_BLOCK: Lazy<Selector> = Lazy::new(|| selector(".Hero-titleContainer"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector(".Hero-title"));
static DESIGNATION: Lazy<Selector> = Lazy::new(|| selector(".Hero-designation"));
static CONTACT_BLOCK: Lazy<Selector> = Lazy::new(|| selector(".ParkFooter-contact"));
static LOCALITY: Lazy<Selector> = Lazy::new(|| selector(r#"[itemprop="addressLocality"]"#));
static REGION: Lazy<Selector> = Lazy::new(|| selector(r#"[itemprop="addressRegion"]"#));
static POSTAL_CODE: Lazy<Selector> = Lazy::new(|| selector(r#"[itemprop="postalCode"]"#));
static TELEPHONE: Lazy<Selector> = Lazy::new(|| selector(r#"[itemprop="telephone"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("Failed to parse selector {css:?}: {e:?}"))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(text_of)
}

fn require<'a>(scope: ElementRef<'a>, selector: &Selector, what: &str) -> Result<ElementRef<'a>> {
    scope
        .select(selector)
        .next()
        .ok_or_else(|| AppError::ParseError(format!("missing {}", what)))
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!(href, error = %e, "Skipping unresolvable link");
            None
        }
    }
}

/// Reads the state drop-down menu of the home page. The first occurrence of a
/// state name wins.
pub fn parse_state_index(html: &str, base: &Url) -> Result<StateIndex> {
    let document = Html::parse_document(html);
    let menu = require(document.root_element(), &STATE_MENU, "state menu")?;

    let mut index = StateIndex::new();
    let items = menu
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li");
    for item in items {
        let Some(anchor) = item.select(&ANCHOR).next() else {
            continue;
        };
        let name = text_of(anchor).to_lowercase();
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if let Some(url) = resolve(base, href) {
            index.entry(name).or_insert(url);
        }
    }
    Ok(index)
}

/// Returns the absolute detail-page URLs listed on a state page, in page order.
pub fn parse_site_links(html: &str, base: &Url) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let parks = require(document.root_element(), &PARK_LIST, "park list")?;

    let links = parks
        .select(&PARK_ENTRY)
        .filter_map(|entry| entry.select(&ANCHOR).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve(base, href))
        .collect();
    Ok(links)
}

/// Builds a `Site` from a detail page. The title block, its title and the
/// contact block must exist; contact fields themselves are optional.
pub fn parse_site_detail(html: &str) -> Result<Site> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let header = require(root, &TITLE_BLOCK, "title block")?;
    let name = text_of(require(header, &TITLE, "site title")?);
    let category = first_text(header, &DESIGNATION).unwrap_or_default();

    let footer = require(root, &CONTACT_BLOCK, "contact block")?;
    let city = first_text(footer, &LOCALITY);
    let state = first_text(footer, &REGION);
    let postal_code = first_text(footer, &POSTAL_CODE);
    let phone = first_text(footer, &TELEPHONE);

    Site::from_parts(
        &name,
        &category,
        city.as_deref(),
        state.as_deref(),
        postal_code.as_deref(),
        phone.as_deref(),
    )
    .ok_or_else(|| AppError::ParseError("site title is empty".to_string()))
}
