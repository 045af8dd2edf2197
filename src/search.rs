//! Candidate URL extraction from Bing image-search markup.
//!
//! Bing's result page carries one `<a class="iusc">` anchor per hit, with an
//! `m` attribute holding a JSON blob of per-result metadata. The full-size
//! image URL lives in that blob's `murl` field. The markup is scraped rather
//! than fetched from an API, so anchors with malformed or incomplete blobs
//! are expected and skipped silently.

use crate::transport::{Transport, TransportError};
use scraper::{Html, Selector};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// How many candidate URLs a search collects at most.
pub const DEFAULT_LIMIT: usize = 50;

const SEARCH_ENDPOINT: &str = "https://www.bing.com/images/search";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Per-result metadata blob. Only `murl` (the full-size image URL) matters.
#[derive(Deserialize)]
struct ResultMeta {
    murl: Option<String>,
}

/// Search Bing Images for `query`, returning up to `limit` candidate image
/// URLs in rank order. The list may be empty; that is not an error.
pub fn search(
    transport: &impl Transport,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, SearchError> {
    let url = search_url(query)?;
    let body = transport.get(url.as_str())?;
    let html = String::from_utf8_lossy(&body);
    Ok(extract_image_urls(&html, limit))
}

/// Build the result-page URL for a query.
fn search_url(query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        SEARCH_ENDPOINT,
        &[("q", query), ("form", "HDRSC2"), ("first", "1")],
    )
}

/// Pull image URLs out of result markup, in document order.
///
/// Anchors whose `m` attribute is missing, is not JSON, or lacks `murl` are
/// skipped. Scanning stops as soon as `limit` URLs have been collected.
pub fn extract_image_urls(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a.iusc").unwrap();

    let mut urls = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(meta) = anchor.value().attr("m") else {
            continue;
        };
        let Ok(meta) = serde_json::from_str::<ResultMeta>(meta) else {
            continue;
        };
        if let Some(murl) = meta.murl {
            urls.push(murl);
            if urls.len() == limit {
                break;
            }
        }
    }
    urls
}
