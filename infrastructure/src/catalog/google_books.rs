//! Google Books catalog client
//!
//! Queries the volumes endpoint with `isbn:` or `intitle:`/`inauthor:`
//! terms and maps the first volume onto a [`CatalogRecord`].

use async_trait::async_trait;
use coverscan_application::{CatalogClient, CatalogError};
use coverscan_domain::{CatalogQuery, CatalogRecord, Isbn};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("coverscan/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: Option<String>,
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VolumeInfo {
    title: Option<String>,
    subtitle: Option<String>,
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    industry_identifiers: Vec<IndustryIdentifier>,
    page_count: Option<u32>,
    categories: Vec<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

impl VolumeInfo {
    /// ISBN-13 from the identifiers, converting an ISBN-10 when that is all there is
    fn isbn13(&self) -> Option<String> {
        let find = |kind: &str| {
            self.industry_identifiers
                .iter()
                .find(|i| i.kind == kind)
                .and_then(|i| Isbn::parse(&i.identifier).ok())
        };
        find("ISBN_13")
            .or_else(|| find("ISBN_10"))
            .map(|isbn| isbn.as_isbn13().to_string())
    }
}

impl From<Volume> for CatalogRecord {
    fn from(volume: Volume) -> Self {
        let isbn = volume.volume_info.isbn13();
        let info = volume.volume_info;
        let title = match (info.title, info.subtitle) {
            (Some(title), Some(subtitle)) if !subtitle.trim().is_empty() => {
                Some(format!("{}: {}", title, subtitle))
            }
            (title, _) => title,
        };
        CatalogRecord {
            source_id: volume.id,
            title,
            authors: info.authors,
            publisher: info.publisher,
            published_date: info.published_date,
            isbn,
            categories: info.categories,
            description: info.description,
            page_count: info.page_count.filter(|&n| n > 0),
            language: info.language,
        }
    }
}

/// Build the `q` parameter for a query
pub fn search_terms(query: &CatalogQuery) -> Option<String> {
    if let Some(isbn) = &query.isbn {
        return Some(format!("isbn:{}", isbn));
    }
    let title = query.title.as_deref()?;
    Some(match query.author.as_deref() {
        Some(author) => format!("intitle:{} inauthor:{}", title, author),
        None => format!("intitle:{}", title),
    })
}

/// Parse a volumes response body into the best record, if any
pub fn parse_volumes(body: &str) -> Result<Option<CatalogRecord>, CatalogError> {
    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
    Ok(response.items.into_iter().next().map(CatalogRecord::from))
}

/// [`CatalogClient`] backed by the Google Books volumes API
pub struct GoogleBooksClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }
}

#[async_trait]
impl CatalogClient for GoogleBooksClient {
    async fn search(&self, query: &CatalogQuery) -> Result<Option<CatalogRecord>, CatalogError> {
        let Some(terms) = search_terms(query) else {
            return Ok(None);
        };
        debug!("Catalog query: {}", terms);

        let mut params = vec![("q", terms), ("maxResults", "1".to_string())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::RequestFailed(format!(
                "catalog returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        parse_volumes(&body)
    }
}
