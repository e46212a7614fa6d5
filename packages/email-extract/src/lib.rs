//! Email address extraction.
//!
//! Pure pattern matching over fetched page text: every substring matching a
//! standard email lexical shape, deduplicated by exact match, first-seen
//! order preserved. No network, no state.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Local part of alphanumeric/`.`/`_`/`%`/`+`/`-`, a domain of
/// alphanumeric/`.`/`-`, and a top-level label of at least two letters.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("email pattern is valid")
});

/// Extract unique email addresses from `text`, in first-seen order.
pub fn extract_emails(text: &str) -> Vec<String> {
    let unique: IndexSet<&str> = EMAIL_RE.find_iter(text).map(|m| m.as_str()).collect();
    unique.into_iter().map(str::to_string).collect()
}

/// Accumulates unique emails across many pages.
#[derive(Debug, Default)]
pub struct EmailSet {
    emails: IndexSet<String>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract from one page's text and fold into the set.
    pub fn harvest(&mut self, text: &str) {
        self.emails.extend(extract_emails(text));
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    /// All emails in discovery order.
    pub fn into_vec(self) -> Vec<String> {
        self.emails.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_address_with_plus_and_subdomain() {
        let emails = extract_emails("contact: a.b+c@sub.example.co at site");
        assert_eq!(emails, vec!["a.b+c@sub.example.co"]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(extract_emails("no email here").is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let emails = extract_emails("dup@x.com dup@x.com");
        assert_eq!(emails, vec!["dup@x.com"]);
    }

    #[test]
    fn multiple_addresses_keep_order() {
        let emails = extract_emails("first@a.com then second@b.org then first@a.com");
        assert_eq!(emails, vec!["first@a.com", "second@b.org"]);
    }

    #[test]
    fn single_letter_tld_is_rejected() {
        assert!(extract_emails("broken@host.x still text").is_empty());
    }

    #[test]
    fn email_set_accumulates_across_pages() {
        let mut set = EmailSet::new();
        set.harvest("sales@acme.com info@acme.com");
        set.harvest("info@acme.com ceo@other.io");
        assert_eq!(
            set.into_vec(),
            vec!["sales@acme.com", "info@acme.com", "ceo@other.io"]
        );
    }
}
