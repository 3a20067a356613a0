//! ISBN value object
//!
//! Accepts ISBN-10 and ISBN-13 input (hyphens and spaces ignored), verifies
//! the check digit and stores the canonical 13-digit form.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated ISBN, stored as 13 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn(String);

impl Isbn {
    /// Parse and validate an ISBN-10 or ISBN-13
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let compact: String = input
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if !compact.is_ascii() {
            return Err(DomainError::InvalidIsbn(input.to_string()));
        }

        match compact.len() {
            13 if compact.chars().all(|c| c.is_ascii_digit())
                && (compact.starts_with("978") || compact.starts_with("979")) =>
            {
                if isbn13_check_digit(&compact[..12]) == compact.as_bytes()[12] - b'0' {
                    Ok(Self(compact))
                } else {
                    Err(DomainError::InvalidIsbn(input.to_string()))
                }
            }
            10 if compact[..9].chars().all(|c| c.is_ascii_digit())
                && compact
                    .chars()
                    .last()
                    .is_some_and(|c| c.is_ascii_digit() || c == 'X') =>
            {
                if isbn10_check_char(&compact[..9]) == compact.chars().last().unwrap_or('?') {
                    let body = format!("978{}", &compact[..9]);
                    let check = isbn13_check_digit(&body);
                    Ok(Self(format!("{}{}", body, check)))
                } else {
                    Err(DomainError::InvalidIsbn(input.to_string()))
                }
            }
            _ => Err(DomainError::InvalidIsbn(input.to_string())),
        }
    }

    /// Whether `input` is a valid ISBN in either form
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Canonical 13-digit form
    pub fn as_isbn13(&self) -> &str {
        &self.0
    }

    /// 10-digit form; only exists for the `978` prefix
    pub fn as_isbn10(&self) -> Option<String> {
        let body = self.0.strip_prefix("978")?;
        let body = &body[..9];
        Some(format!("{}{}", body, isbn10_check_char(body)))
    }
}

fn isbn13_check_digit(first12: &str) -> u8 {
    let sum: u32 = first12
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

fn isbn10_check_char(first9: &str) -> char {
    let sum: u32 = first9
        .bytes()
        .enumerate()
        .map(|(i, b)| (10 - i as u32) * (b - b'0') as u32)
        .sum();
    match (11 - (sum % 11)) % 11 {
        10 => 'X',
        d => char::from(b'0' + d as u8),
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Isbn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Isbn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Isbn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Isbn::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_isbn13() {
        let isbn = Isbn::parse("978-0-13-235088-4").unwrap();
        assert_eq!(isbn.as_isbn13(), "9780132350884");
    }

    #[test]
    fn test_parse_isbn10_converts_to_13() {
        let isbn = Isbn::parse("0132350882").unwrap();
        assert_eq!(isbn.as_isbn13(), "9780132350884");
        assert_eq!(isbn.as_isbn10().as_deref(), Some("0132350882"));
    }

    #[test]
    fn test_isbn10_with_x_check_digit() {
        let isbn = Isbn::parse("0-8044-2957-x").unwrap();
        assert_eq!(isbn.as_isbn10().as_deref(), Some("080442957X"));
    }

    #[test]
    fn test_bad_check_digit_rejected() {
        assert!(!Isbn::is_valid("9780132350885"));
        assert!(!Isbn::is_valid("0132350883"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            Isbn::parse("not-an-isbn"),
            Err(DomainError::InvalidIsbn(_))
        ));
        assert!(!Isbn::is_valid(""));
        assert!(!Isbn::is_valid("97801323508"));
    }

    #[test]
    fn test_plain_ean13_rejected() {
        // Valid EAN-13 check digit, but not in the Bookland range
        assert!(!Isbn::is_valid("4006381333931"));
    }

    #[test]
    fn test_979_has_no_isbn10() {
        let isbn = Isbn::parse("9791090636071").unwrap();
        assert!(isbn.as_isbn10().is_none());
    }
}
