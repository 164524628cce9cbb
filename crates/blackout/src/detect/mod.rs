//! Contact-information detection.
//!
//! A fixed set of detection categories, a compiled pattern library, and the
//! report type that groups detected terms per category.

mod library;
mod patterns;

pub use library::PatternLibrary;
pub use patterns::CategoryPattern;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A detection category.
///
/// Categories are a closed set; unknown names are rejected up front with
/// [`Error::InvalidCategory`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Email addresses.
    Email,
    /// Phone numbers in common international and domestic layouts.
    Phone,
    /// LinkedIn profile URLs.
    Linkedin,
    /// Portfolio-hosting URLs (GitHub, Behance, Dribbble, personal sites).
    Portfolio,
    /// Any URL-shaped string.
    AllUrls,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 5] = [
        Category::Email,
        Category::Phone,
        Category::Linkedin,
        Category::Portfolio,
        Category::AllUrls,
    ];

    /// The wire name used in requests, reports, and the CLI.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Linkedin => "linkedin",
            Self::Portfolio => "portfolio",
            Self::AllUrls => "all_urls",
        }
    }

    /// A short human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Email => "email addresses",
            Self::Phone => "phone numbers",
            Self::Linkedin => "LinkedIn profile URLs",
            Self::Portfolio => "portfolio and code-hosting URLs",
            Self::AllUrls => "all URLs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "linkedin" => Ok(Self::Linkedin),
            "portfolio" => Ok(Self::Portfolio),
            "all_urls" => Ok(Self::AllUrls),
            other => Err(Error::InvalidCategory {
                name: other.to_string(),
            }),
        }
    }
}

/// Detected terms grouped per category.
///
/// The shape is fixed: every category field is present even when the category
/// was not requested (it is then empty). Within each list, terms are unique
/// and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedItems {
    /// Detected email addresses.
    pub emails: Vec<String>,
    /// Detected phone numbers.
    pub phones: Vec<String>,
    /// Detected LinkedIn profile URLs.
    pub linkedin: Vec<String>,
    /// Detected portfolio URLs.
    pub portfolios: Vec<String>,
    /// All detected URLs.
    pub urls: Vec<String>,
}

impl DetectedItems {
    /// True when no category detected anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.phones.is_empty()
            && self.linkedin.is_empty()
            && self.portfolios.is_empty()
            && self.urls.is_empty()
    }

    /// Total number of detected terms across all categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.emails.len()
            + self.phones.len()
            + self.linkedin.len()
            + self.portfolios.len()
            + self.urls.len()
    }

    /// Union of all detected terms, deduplicated across categories.
    ///
    /// A URL that is both a portfolio and a generic URL appears once, so
    /// redaction never processes the same literal twice.
    #[must_use]
    pub fn term_union(&self) -> BTreeSet<String> {
        let mut union = BTreeSet::new();
        for list in [
            &self.emails,
            &self.phones,
            &self.linkedin,
            &self.portfolios,
            &self.urls,
        ] {
            union.extend(list.iter().cloned());
        }
        union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.wire_name().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_rejects_unknown_name() {
        let err = "ssn".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::InvalidCategory { name } if name == "ssn"));
    }

    #[test]
    fn test_category_names_are_case_sensitive() {
        assert!("Email".parse::<Category>().is_err());
        assert!("EMAIL".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_wire_names() {
        let json = serde_json::to_string(&Category::AllUrls).unwrap();
        assert_eq!(json, "\"all_urls\"");
        let parsed: Category = serde_json::from_str("\"portfolio\"").unwrap();
        assert_eq!(parsed, Category::Portfolio);
    }

    #[test]
    fn test_detected_items_empty() {
        let items = DetectedItems::default();
        assert!(items.is_empty());
        assert_eq!(items.total(), 0);
        assert!(items.term_union().is_empty());
    }

    #[test]
    fn test_term_union_deduplicates_across_categories() {
        let items = DetectedItems {
            portfolios: vec!["github.com/jane".to_string()],
            urls: vec!["github.com/jane".to_string(), "example.com".to_string()],
            ..DetectedItems::default()
        };
        let union = items.term_union();
        assert_eq!(union.len(), 2);
        assert!(union.contains("github.com/jane"));
        assert_eq!(items.total(), 3);
    }
}
