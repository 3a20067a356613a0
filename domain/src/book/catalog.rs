//! Authoritative catalog lookups
//!
//! A catalog (e.g. Google Books) is trusted over anything read off the
//! cover. Its values overwrite extracted ones at a fixed confidence.

use super::isbn::Isbn;
use super::metadata::{BookMetadata, MetadataField};
use serde::{Deserialize, Serialize};

/// Confidence assigned to every field supplied by the catalog
pub const CATALOG_CONFIDENCE: f64 = 0.95;

/// How a catalog record was located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogMatch {
    Isbn,
    TitleAuthor,
}

/// Search parameters for a catalog lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl CatalogQuery {
    pub fn by_isbn(isbn: impl Into<String>) -> Self {
        Self {
            isbn: Some(isbn.into()),
            ..Default::default()
        }
    }

    pub fn by_title(title: impl Into<String>, author: Option<String>) -> Self {
        Self {
            isbn: None,
            title: Some(title.into()),
            author,
        }
    }

    /// Build the lookup for extracted metadata.
    ///
    /// An ISBN is preferred (normalized to ISBN-13 when it validates);
    /// otherwise a usable title plus the first author. Returns `None` when
    /// neither is available.
    pub fn from_metadata(metadata: &BookMetadata) -> Option<Self> {
        if let Some(raw) = metadata.text(MetadataField::Isbn) {
            let isbn = Isbn::parse(raw)
                .map(|i| i.as_isbn13().to_string())
                .unwrap_or_else(|_| raw.to_string());
            return Some(Self::by_isbn(isbn));
        }

        metadata.usable_title().map(|title| {
            Self::by_title(title, metadata.primary_author().map(str::to_string))
        })
    }

    pub fn match_kind(&self) -> CatalogMatch {
        if self.isbn.is_some() {
            CatalogMatch::Isbn
        } else {
            CatalogMatch::TitleAuthor
        }
    }
}

/// A record returned by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    /// Catalog-specific identifier (volume id, work key, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn present(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|s| !s.trim().is_empty())
}

impl CatalogRecord {
    /// Overwrite `metadata` with this record's values.
    ///
    /// Title, authors, publisher, published date, categories, description,
    /// page count and language replace the extracted values whenever the
    /// record has them. The ISBN is only filled in when none was extracted.
    /// Returns the fields that were written.
    pub fn apply_to(&self, metadata: &mut BookMetadata) -> Vec<MetadataField> {
        let mut written = Vec::new();

        let scalars = [
            (MetadataField::Title, &self.title),
            (MetadataField::Publisher, &self.publisher),
            (MetadataField::PublishedDate, &self.published_date),
            (MetadataField::Description, &self.description),
            (MetadataField::Language, &self.language),
        ];
        for (field, value) in scalars {
            if let Some(value) = present(value) {
                metadata.set_text(field, value.clone());
                written.push(field);
            }
        }

        if !self.authors.is_empty() {
            metadata.authors = self.authors.clone();
            written.push(MetadataField::Authors);
        }

        if !self.categories.is_empty() {
            metadata.categories = self.categories.clone();
            written.push(MetadataField::Categories);
        }

        if let Some(count) = self.page_count {
            metadata.page_count = Some(count);
            written.push(MetadataField::PageCount);
        }

        if !metadata.has(MetadataField::Isbn)
            && let Some(isbn) = present(&self.isbn)
        {
            metadata.isbn = Some(isbn.clone());
            written.push(MetadataField::Isbn);
        }

        written.sort();
        written
    }
}

/// Outcome of a successful catalog enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEnrichment {
    pub query: CatalogQuery,
    pub matched_by: CatalogMatch,
    /// Fields overwritten from the catalog record
    pub fields: Vec<MetadataField>,
    pub record: CatalogRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_code_record() -> CatalogRecord {
        CatalogRecord {
            title: Some("Clean Code: A Handbook of Agile Software Craftsmanship".to_string()),
            authors: vec!["Robert C. Martin".to_string()],
            publisher: Some("Prentice Hall".to_string()),
            published_date: Some("2008-08-01".to_string()),
            isbn: Some("9780132350884".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_prefers_isbn() {
        let metadata = BookMetadata::new()
            .with_title("Clean Code")
            .with_isbn("0-13-235088-2");
        let query = CatalogQuery::from_metadata(&metadata).unwrap();
        assert_eq!(query.isbn.as_deref(), Some("9780132350884"));
        assert_eq!(query.match_kind(), CatalogMatch::Isbn);
    }

    #[test]
    fn test_query_falls_back_to_title_and_author() {
        let metadata = BookMetadata::new()
            .with_title("Refactoring")
            .with_author("Martin Fowler");
        let query = CatalogQuery::from_metadata(&metadata).unwrap();
        assert_eq!(query.title.as_deref(), Some("Refactoring"));
        assert_eq!(query.author.as_deref(), Some("Martin Fowler"));
        assert_eq!(query.match_kind(), CatalogMatch::TitleAuthor);
    }

    #[test]
    fn test_no_query_without_isbn_or_title() {
        let metadata = BookMetadata::new().with_title("It").with_publisher("Viking");
        assert!(CatalogQuery::from_metadata(&metadata).is_none());
    }

    #[test]
    fn test_apply_overwrites_core_fields() {
        let mut metadata = BookMetadata::new()
            .with_title("Clean Code")
            .with_author("Bob Martin")
            .with_isbn("9780132350884");

        let written = clean_code_record().apply_to(&mut metadata);

        assert_eq!(
            metadata.title.as_deref(),
            Some("Clean Code: A Handbook of Agile Software Craftsmanship")
        );
        assert_eq!(metadata.authors, vec!["Robert C. Martin".to_string()]);
        assert_eq!(metadata.publisher.as_deref(), Some("Prentice Hall"));
        assert_eq!(
            written,
            vec![
                MetadataField::Title,
                MetadataField::Authors,
                MetadataField::Publisher,
                MetadataField::PublishedDate,
            ]
        );
    }

    #[test]
    fn test_apply_fills_missing_isbn_only() {
        let mut metadata = BookMetadata::new().with_title("Clean Code");
        let written = clean_code_record().apply_to(&mut metadata);
        assert!(written.contains(&MetadataField::Isbn));
        assert_eq!(metadata.isbn.as_deref(), Some("9780132350884"));
    }
}
