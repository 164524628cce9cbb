//! Compiled detection patterns.
//!
//! Each pattern wraps a compiled regex plus the capture group that holds the
//! actual term. The `regex` crate has no look-around, so patterns that need
//! digit boundaries match the boundary characters in non-capturing groups and
//! keep the term in an inner capture group instead.

use regex::Regex;

/// A named, compiled detection pattern.
#[derive(Debug, Clone)]
pub struct CategoryPattern {
    /// Stable pattern name, used in trace logging.
    pub name: &'static str,
    regex: Regex,
    /// Capture group index holding the matched term (0 = whole match).
    group: usize,
}

impl CategoryPattern {
    fn new(name: &'static str, pattern: &str, group: usize) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("Invalid builtin pattern"),
            group,
        }
    }

    /// All matches of this pattern in `text`, as owned strings.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        if self.group == 0 {
            return self
                .regex
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect();
        }

        // Boundary-group patterns consume the character after the term, so
        // iterating whole matches would skip a term that starts right there.
        // Rescan from the end of the term group instead.
        let mut found = Vec::new();
        let mut start = 0;
        while let Some(caps) = self.regex.captures_at(text, start) {
            let Some(term) = caps.get(self.group) else {
                break;
            };
            found.push(term.as_str().to_string());
            start = term.end().max(start + 1);
        }
        found
    }
}

/// Email addresses.
pub(crate) fn email_pattern() -> CategoryPattern {
    CategoryPattern::new(
        "email",
        r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        0,
    )
}

/// Phone numbers: several passes whose results are unioned, then filtered.
///
/// The passes mirror common layouts: international with country code,
/// parenthesized area code, plain separated triplets, bare 10-digit runs,
/// and Indian mobile formats.
pub(crate) fn phone_patterns() -> Vec<CategoryPattern> {
    vec![
        CategoryPattern::new(
            "phone-intl",
            r"\+\d{1,3}[-.\s]?\(?\d{1,4}\)?[-.\s]?\d{2,4}[-.\s]?\d{3,4}[-.\s]?\d{0,4}",
            0,
        ),
        CategoryPattern::new("phone-paren", r"\(\d{3}\)[-.\s]?\d{3}[-.\s]?\d{4}", 0),
        CategoryPattern::new(
            "phone-separated",
            r"(?:^|[^\d])(\d{3}[-.\s]\d{3}[-.\s]\d{4})(?:$|[^\d])",
            1,
        ),
        CategoryPattern::new("phone-bare10", r"(?:^|[^.\d])(\d{10})(?:$|[^.\d])", 1),
        CategoryPattern::new("phone-in-mobile", r"\+91[-.\s]?\d{5}[-.\s]?\d{5}", 0),
        CategoryPattern::new(
            "phone-in-plain",
            r"(?:^|[^\d])(91[-.\s]\d{3,5}[-.\s]\d{3,5}[-.\s]?\d{0,4})(?:$|[^\d])",
            1,
        ),
    ]
}

/// LinkedIn profile URLs, scheme and `www.` optional.
pub(crate) fn linkedin_pattern() -> CategoryPattern {
    CategoryPattern::new(
        "linkedin",
        r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_-]+/?",
        0,
    )
}

/// Portfolio-hosting URLs plus a catch-all for personal-site domains.
pub(crate) fn portfolio_patterns() -> Vec<CategoryPattern> {
    vec![
        CategoryPattern::new(
            "portfolio-github",
            r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_-]+/?",
            0,
        ),
        CategoryPattern::new(
            "portfolio-behance",
            r"(?i)(?:https?://)?(?:www\.)?behance\.net/[A-Za-z0-9_-]+/?",
            0,
        ),
        CategoryPattern::new(
            "portfolio-dribbble",
            r"(?i)(?:https?://)?(?:www\.)?dribbble\.com/[A-Za-z0-9_-]+/?",
            0,
        ),
        CategoryPattern::new(
            "portfolio-named",
            r"(?i)(?:https?://)?(?:www\.)?portfolio\.com/[A-Za-z0-9_-]+/?",
            0,
        ),
        CategoryPattern::new(
            "portfolio-site",
            r"(?i)(?:https?://)?[A-Za-z0-9.-]+\.(?:com|net|org|io|dev|me|co)/?\S*",
            0,
        ),
    ]
}

/// Any URL-shaped string: scheme optional, domain with a TLD, optional path.
pub(crate) fn url_pattern() -> CategoryPattern {
    CategoryPattern::new(
        "all-urls",
        r"(?i)(?:https?://)?(?:www\.)?[A-Za-z0-9][A-Za-z0-9.-]*\.[A-Za-z]{2,}(?:/[^\s]*)?",
        0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern_basic() {
        let pattern = email_pattern();
        let found = pattern.find_all("Contact john.doe@example.com today");
        assert_eq!(found, vec!["john.doe@example.com"]);
    }

    #[test]
    fn test_email_pattern_multiple() {
        let pattern = email_pattern();
        let found = pattern.find_all("a@b.co and x.y+z@mail.example.org");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_phone_paren_pattern() {
        let patterns = phone_patterns();
        let paren = patterns.iter().find(|p| p.name == "phone-paren").unwrap();
        assert_eq!(paren.find_all("(555) 123-4567"), vec!["(555) 123-4567"]);
    }

    #[test]
    fn test_phone_separated_extracts_inner_group() {
        let patterns = phone_patterns();
        let sep = patterns
            .iter()
            .find(|p| p.name == "phone-separated")
            .unwrap();
        // The boundary characters must not leak into the result.
        assert_eq!(sep.find_all("call 555-987-6543 now"), vec!["555-987-6543"]);
    }

    #[test]
    fn test_phone_separated_finds_adjacent_numbers() {
        let patterns = phone_patterns();
        let sep = patterns
            .iter()
            .find(|p| p.name == "phone-separated")
            .unwrap();
        // The numbers share one separator character between them.
        assert_eq!(
            sep.find_all("call 555-111-2222,555-333-4444 now"),
            vec!["555-111-2222", "555-333-4444"]
        );
    }

    #[test]
    fn test_phone_separated_rejects_digit_neighbors() {
        let patterns = phone_patterns();
        let sep = patterns
            .iter()
            .find(|p| p.name == "phone-separated")
            .unwrap();
        assert!(sep.find_all("9555-987-65432").is_empty());
    }

    #[test]
    fn test_phone_bare10() {
        let patterns = phone_patterns();
        let bare = patterns.iter().find(|p| p.name == "phone-bare10").unwrap();
        assert_eq!(bare.find_all("id 5551234567 ok"), vec!["5551234567"]);
        assert!(bare.find_all("15551234567").is_empty());
        // A trailing decimal point marks a number, not a phone.
        assert!(bare.find_all("total 5551234567.5").is_empty());
    }

    #[test]
    fn test_phone_intl() {
        let patterns = phone_patterns();
        let intl = patterns.iter().find(|p| p.name == "phone-intl").unwrap();
        assert!(!intl.find_all("+1 555-010-2030").is_empty());
        assert!(!intl.find_all("+44 20 7946 0958").is_empty());
    }

    #[test]
    fn test_phone_indian_mobile() {
        let patterns = phone_patterns();
        let indian = patterns
            .iter()
            .find(|p| p.name == "phone-in-mobile")
            .unwrap();
        assert_eq!(indian.find_all("+91 92268 81922"), vec!["+91 92268 81922"]);
    }

    #[test]
    fn test_linkedin_pattern_scheme_optional() {
        let pattern = linkedin_pattern();
        assert!(!pattern.find_all("linkedin.com/in/jane-doe").is_empty());
        assert!(!pattern
            .find_all("https://www.linkedin.com/in/jane_doe2")
            .is_empty());
    }

    #[test]
    fn test_portfolio_github() {
        let patterns = portfolio_patterns();
        let github = patterns
            .iter()
            .find(|p| p.name == "portfolio-github")
            .unwrap();
        assert_eq!(github.find_all("see github.com/octocat"), vec!["github.com/octocat"]);
    }

    #[test]
    fn test_url_pattern_matches_domains() {
        let pattern = url_pattern();
        assert!(!pattern.find_all("visit example.com/about").is_empty());
        assert!(!pattern.find_all("https://rust-lang.org").is_empty());
        assert!(pattern.find_all("no links here").is_empty());
    }
}
