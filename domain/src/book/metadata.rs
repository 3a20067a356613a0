//! Bibliographic metadata read off a book cover

use serde::{Deserialize, Serialize};

/// A single bibliographic field
///
/// Used as the key for per-field confidence and provenance maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Title,
    Subtitle,
    Authors,
    Isbn,
    Publisher,
    PublishedDate,
    Description,
    Language,
    PageCount,
    Categories,
    Themes,
}

impl MetadataField {
    /// Every field, in display order
    pub const ALL: [MetadataField; 11] = [
        MetadataField::Title,
        MetadataField::Subtitle,
        MetadataField::Authors,
        MetadataField::Isbn,
        MetadataField::Publisher,
        MetadataField::PublishedDate,
        MetadataField::Description,
        MetadataField::Language,
        MetadataField::PageCount,
        MetadataField::Categories,
        MetadataField::Themes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Subtitle => "subtitle",
            MetadataField::Authors => "authors",
            MetadataField::Isbn => "isbn",
            MetadataField::Publisher => "publisher",
            MetadataField::PublishedDate => "published_date",
            MetadataField::Description => "description",
            MetadataField::Language => "language",
            MetadataField::PageCount => "page_count",
            MetadataField::Categories => "categories",
            MetadataField::Themes => "themes",
        }
    }

    /// List-valued fields are concatenated during consensus instead of
    /// taking the first value
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            MetadataField::Authors | MetadataField::Categories | MetadataField::Themes
        )
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured book metadata
///
/// Every field is optional; list fields are empty when unknown. Blank strings
/// count as absent (see [`BookMetadata::has`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
}

/// Minimum trimmed length for a title to be worth a catalog lookup
pub const MIN_USABLE_TITLE_LEN: usize = 3;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl BookMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Scalar string value of a field, ignoring blank strings
    pub fn text(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::Title => non_blank(&self.title),
            MetadataField::Subtitle => non_blank(&self.subtitle),
            MetadataField::Isbn => non_blank(&self.isbn),
            MetadataField::Publisher => non_blank(&self.publisher),
            MetadataField::PublishedDate => non_blank(&self.published_date),
            MetadataField::Description => non_blank(&self.description),
            MetadataField::Language => non_blank(&self.language),
            MetadataField::PageCount
            | MetadataField::Authors
            | MetadataField::Categories
            | MetadataField::Themes => None,
        }
    }

    /// Values of a list field (empty slice for scalar fields)
    pub fn list(&self, field: MetadataField) -> &[String] {
        match field {
            MetadataField::Authors => &self.authors,
            MetadataField::Categories => &self.categories,
            MetadataField::Themes => &self.themes,
            _ => &[],
        }
    }

    /// Mutable access to a list field; `None` for scalar fields
    pub fn list_mut(&mut self, field: MetadataField) -> Option<&mut Vec<String>> {
        match field {
            MetadataField::Authors => Some(&mut self.authors),
            MetadataField::Categories => Some(&mut self.categories),
            MetadataField::Themes => Some(&mut self.themes),
            _ => None,
        }
    }

    /// Set a scalar string field. `PageCount` is parsed from the text and
    /// silently ignored when it is not a number.
    pub fn set_text(&mut self, field: MetadataField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MetadataField::Title => self.title = Some(value),
            MetadataField::Subtitle => self.subtitle = Some(value),
            MetadataField::Isbn => self.isbn = Some(value),
            MetadataField::Publisher => self.publisher = Some(value),
            MetadataField::PublishedDate => self.published_date = Some(value),
            MetadataField::Description => self.description = Some(value),
            MetadataField::Language => self.language = Some(value),
            MetadataField::PageCount => {
                if let Ok(count) = value.trim().parse() {
                    self.page_count = Some(count);
                }
            }
            MetadataField::Authors | MetadataField::Categories | MetadataField::Themes => {
                if let Some(list) = self.list_mut(field) {
                    *list = vec![value];
                }
            }
        }
    }

    /// Whether a field carries a usable value
    pub fn has(&self, field: MetadataField) -> bool {
        match field {
            MetadataField::PageCount => self.page_count.is_some(),
            f if f.is_list() => self.list(f).iter().any(|v| !v.trim().is_empty()),
            f => self.text(f).is_some(),
        }
    }

    /// All fields that carry a value, in [`MetadataField::ALL`] order
    pub fn populated_fields(&self) -> Vec<MetadataField> {
        MetadataField::ALL
            .into_iter()
            .filter(|f| self.has(*f))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields().is_empty()
    }

    /// Title suitable for a catalog search
    pub fn usable_title(&self) -> Option<&str> {
        self.text(MetadataField::Title)
            .filter(|t| t.chars().count() >= MIN_USABLE_TITLE_LEN)
    }

    /// First listed author, if any
    pub fn primary_author(&self) -> Option<&str> {
        self.authors
            .iter()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let metadata = BookMetadata {
            title: Some("   ".to_string()),
            authors: vec!["".to_string()],
            ..Default::default()
        };
        assert!(!metadata.has(MetadataField::Title));
        assert!(!metadata.has(MetadataField::Authors));
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_populated_fields_order() {
        let metadata = BookMetadata::new()
            .with_publisher("Prentice Hall")
            .with_title("Clean Code")
            .with_isbn("9780132350884");
        assert_eq!(
            metadata.populated_fields(),
            vec![
                MetadataField::Title,
                MetadataField::Isbn,
                MetadataField::Publisher
            ]
        );
    }

    #[test]
    fn test_usable_title_requires_three_chars() {
        assert!(BookMetadata::new().with_title("It").usable_title().is_none());
        assert_eq!(
            BookMetadata::new().with_title("  Dune ").usable_title(),
            Some("Dune")
        );
    }

    #[test]
    fn test_set_text_page_count() {
        let mut metadata = BookMetadata::new();
        metadata.set_text(MetadataField::PageCount, "464");
        assert_eq!(metadata.page_count, Some(464));
        metadata.set_text(MetadataField::PageCount, "many");
        assert_eq!(metadata.page_count, Some(464));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let metadata = BookMetadata::new().with_title("Dune");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Dune" }));
    }

    #[test]
    fn test_field_keys_are_snake_case() {
        let json = serde_json::to_string(&MetadataField::PublishedDate).unwrap();
        assert_eq!(json, "\"published_date\"");
    }
}
