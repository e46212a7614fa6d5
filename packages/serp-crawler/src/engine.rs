//! Search engine profiles.
//!
//! Each supported engine is a variant of [`SearchEngine`], a closed set
//! resolved at crawl start. A profile carries everything needed to talk to
//! one engine: the query URL template and the two DOM selectors the crawl
//! loop evaluates (result links, next-page control).

use url::Url;

use crate::error::UnknownEngineError;

/// Results per SERP, matching the default page size of both engines.
pub const RESULTS_PER_PAGE: u32 = 10;

/// Static description of how to talk to one search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineProfile {
    /// Search endpoint, without query string
    pub base_url: &'static str,
    /// Query-string parameter carrying the search term
    pub query_param: &'static str,
    /// Query-string parameter carrying the result offset
    pub offset_param: &'static str,
    /// Selector matching organic result links
    pub result_link_selector: &'static str,
    /// Selector whose presence means more result pages exist
    pub next_page_selector: &'static str,
}

const GOOGLE: EngineProfile = EngineProfile {
    base_url: "https://www.google.com/search",
    query_param: "q",
    offset_param: "start",
    result_link_selector: r#"div.g a[href^="http"]"#,
    next_page_selector: "#pnnext",
};

const BING: EngineProfile = EngineProfile {
    base_url: "https://www.bing.com/search",
    query_param: "q",
    offset_param: "first",
    result_link_selector: r#"#b_results .b_algo h2 a[href^="http"]"#,
    next_page_selector: "a.sb_pagN",
};

/// Supported search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEngine {
    Google,
    Bing,
}

impl SearchEngine {
    /// Resolve an engine by name.
    ///
    /// Fails fast with [`UnknownEngineError`] for anything outside the
    /// supported set; nothing defaults silently.
    pub fn from_name(name: &str) -> Result<Self, UnknownEngineError> {
        match name.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "bing" => Ok(Self::Bing),
            _ => Err(UnknownEngineError {
                name: name.to_string(),
            }),
        }
    }

    /// The static profile for this engine.
    pub fn profile(&self) -> &'static EngineProfile {
        match self {
            Self::Google => &GOOGLE,
            Self::Bing => &BING,
        }
    }

    /// Build the search URL for a 1-based result page.
    ///
    /// The offset is `(page_index - 1) * 10`, so page 1 carries offset 0.
    pub fn search_url(&self, term: &str, page_index: u32) -> Url {
        let profile = self.profile();
        let offset = (page_index.saturating_sub(1)) * RESULTS_PER_PAGE;

        let mut url = Url::parse(profile.base_url).expect("engine base URLs are valid");
        url.query_pairs_mut()
            .append_pair(profile.query_param, term)
            .append_pair(profile.offset_param, &offset.to_string());
        url
    }
}

impl std::fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Bing => write!(f, "bing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_supported_engines() {
        assert_eq!(SearchEngine::from_name("google").unwrap(), SearchEngine::Google);
        assert_eq!(SearchEngine::from_name("Bing").unwrap(), SearchEngine::Bing);
    }

    #[test]
    fn rejects_unknown_engine() {
        let err = SearchEngine::from_name("yahoo").unwrap_err();
        assert_eq!(err.name, "yahoo");
    }

    #[test]
    fn first_page_has_zero_offset() {
        for engine in [SearchEngine::Google, SearchEngine::Bing] {
            let url = engine.search_url("b2b business uk", 1);
            let offset_param = engine.profile().offset_param;
            let offset = url
                .query_pairs()
                .find(|(k, _)| k == offset_param)
                .map(|(_, v)| v.into_owned())
                .unwrap();
            assert_eq!(offset, "0");
        }
    }

    #[test]
    fn page_offset_is_ten_per_page() {
        for engine in [SearchEngine::Google, SearchEngine::Bing] {
            for page in 1..=5u32 {
                let url = engine.search_url("rust", page);
                let offset_param = engine.profile().offset_param;
                let offset = url
                    .query_pairs()
                    .find(|(k, _)| k == offset_param)
                    .map(|(_, v)| v.into_owned())
                    .unwrap();
                assert_eq!(offset, ((page - 1) * 10).to_string());
            }
        }
    }

    #[test]
    fn search_url_carries_encoded_term() {
        let url = SearchEngine::Google.search_url("b2b business uk", 1);
        assert!(url.as_str().starts_with("https://www.google.com/search?"));
        let term = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(term, "b2b business uk");
    }

    #[test]
    fn profiles_are_fully_populated() {
        for engine in [SearchEngine::Google, SearchEngine::Bing] {
            let p = engine.profile();
            assert!(!p.base_url.is_empty());
            assert!(!p.query_param.is_empty());
            assert!(!p.offset_param.is_empty());
            assert!(!p.result_link_selector.is_empty());
            assert!(!p.next_page_selector.is_empty());
        }
    }
}
