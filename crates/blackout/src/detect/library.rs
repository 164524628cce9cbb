//! The compiled pattern library and per-category finders.

use std::collections::BTreeSet;

use regex::Regex;
use tracing::{debug, trace};

use super::patterns::{
    email_pattern, linkedin_pattern, phone_patterns, portfolio_patterns, url_pattern,
    CategoryPattern,
};
use super::{Category, DetectedItems};

/// All detection patterns, compiled once and reused across documents.
#[derive(Debug)]
pub struct PatternLibrary {
    email: CategoryPattern,
    phones: Vec<CategoryPattern>,
    linkedin: CategoryPattern,
    portfolios: Vec<CategoryPattern>,
    url: CategoryPattern,
    non_digit: Regex,
    year: Regex,
    year_range: Regex,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// Compile the builtin pattern set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            email: email_pattern(),
            phones: phone_patterns(),
            linkedin: linkedin_pattern(),
            portfolios: portfolio_patterns(),
            url: url_pattern(),
            non_digit: Regex::new(r"[^\d]").expect("Invalid builtin pattern"),
            year: Regex::new(r"^(19|20)\d{2}$").expect("Invalid builtin pattern"),
            year_range: Regex::new(r"^(19|20)\d{2}[-\x{2013}]\s*(19|20)?\d{2}$")
                .expect("Invalid builtin pattern"),
        }
    }

    /// Find email addresses.
    #[must_use]
    pub fn find_emails(&self, text: &str) -> BTreeSet<String> {
        self.email.find_all(text).into_iter().collect()
    }

    /// Find phone numbers.
    ///
    /// Runs every phone pattern, unions the matches, then drops false
    /// positives: strings with fewer than seven digits, bare calendar years,
    /// and year ranges.
    #[must_use]
    pub fn find_phones(&self, text: &str) -> BTreeSet<String> {
        let mut candidates: BTreeSet<String> = BTreeSet::new();
        for pattern in &self.phones {
            for hit in pattern.find_all(text) {
                trace!(pattern = pattern.name, term = %hit, "phone candidate");
                candidates.insert(hit);
            }
        }

        candidates
            .into_iter()
            .filter(|candidate| !self.is_phone_false_positive(candidate))
            .collect()
    }

    fn is_phone_false_positive(&self, candidate: &str) -> bool {
        let digits_only = self.non_digit.replace_all(candidate, "");
        if digits_only.len() < 7 {
            return true;
        }
        if digits_only.len() == 4
            && (digits_only.starts_with("19") || digits_only.starts_with("20"))
        {
            return true;
        }
        let trimmed = candidate.trim();
        self.year.is_match(trimmed) || self.year_range.is_match(trimmed)
    }

    /// Find LinkedIn profile URLs.
    #[must_use]
    pub fn find_linkedin(&self, text: &str) -> BTreeSet<String> {
        self.linkedin.find_all(text).into_iter().collect()
    }

    /// Find portfolio URLs across all portfolio patterns.
    #[must_use]
    pub fn find_portfolios(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for pattern in &self.portfolios {
            found.extend(pattern.find_all(text));
        }
        found
    }

    /// Find all URL-shaped strings.
    #[must_use]
    pub fn find_all_urls(&self, text: &str) -> BTreeSet<String> {
        self.url.find_all(text).into_iter().collect()
    }

    /// Run detection for the requested categories.
    ///
    /// The result always carries every category field; categories that were
    /// not requested stay empty. Each list is deduplicated and sorted.
    #[must_use]
    pub fn detect(&self, text: &str, categories: &[Category]) -> DetectedItems {
        let mut items = DetectedItems::default();

        for category in categories {
            match category {
                Category::Email => {
                    items.emails = self.find_emails(text).into_iter().collect();
                }
                Category::Phone => {
                    items.phones = self.find_phones(text).into_iter().collect();
                }
                Category::Linkedin => {
                    items.linkedin = self.find_linkedin(text).into_iter().collect();
                }
                Category::Portfolio => {
                    items.portfolios = self.find_portfolios(text).into_iter().collect();
                }
                Category::AllUrls => {
                    items.urls = self.find_all_urls(text).into_iter().collect();
                }
            }
        }

        debug!(
            emails = items.emails.len(),
            phones = items.phones.len(),
            linkedin = items.linkedin.len(),
            portfolios = items.portfolios.len(),
            urls = items.urls.len(),
            "detection complete"
        );

        items
    }
}
