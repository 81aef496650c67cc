//! Canonical search request and its URL forms.
//!
//! The shareable URL (`/search?q=..&page=..&sort=..`) and the API query are
//! both derived from [`SearchRequest`]; parsing the former reconstructs an
//! equal request.

use crate::config::SiteConfig;
use crate::i18n::{I18nArg, LocaleResolver};
use dhtsearch_api_models::SortKey;
use std::fmt::Write as _;

/// Path of the search page.
pub const SEARCH_PAGE_PATH: &str = "/search";
/// Path of the search endpoint.
pub const SEARCH_API_PATH: &str = "/api/search";

/// Rejected search input. Never surfaced as a fetch failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchInputError {
    /// Keyword is empty after trimming.
    #[error("search keyword is empty")]
    EmptyKeyword,
    /// Keyword exceeds the configured length.
    #[error("search keyword exceeds {max} characters")]
    KeywordTooLong {
        /// Configured maximum.
        max: usize,
    },
    /// Page numbers start at 1.
    #[error("page {0} is out of range")]
    InvalidPage(u32),
}

impl SearchInputError {
    /// Warning text shown for the rejected input.
    #[must_use]
    pub fn user_message(&self, locale: &LocaleResolver) -> String {
        match self {
            Self::EmptyKeyword => locale.resolve("search.empty_keyword"),
            Self::KeywordTooLong { max } => {
                locale.resolve_with("search.keyword_too_long", &[I18nArg::new("max", max)])
            }
            Self::InvalidPage(_) => locale.resolve("common.error"),
        }
    }
}

/// Optional content filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchFilters {
    /// Only torrents containing video.
    pub has_video: bool,
    /// Only torrents containing audio.
    pub has_audio: bool,
}

impl SearchFilters {
    fn pairs(self) -> impl Iterator<Item = (&'static str, String)> {
        [("has_video", self.has_video), ("has_audio", self.has_audio)]
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| (name, "true".to_string()))
    }
}

/// What the user is currently searching for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    keyword: String,
    page: u32,
    sort: SortKey,
    filters: SearchFilters,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            page: 1,
            sort: SortKey::default(),
            filters: SearchFilters::default(),
        }
    }
}

impl SearchRequest {
    /// Request for page 1 of `keyword` with default sort and no filters.
    #[must_use]
    pub fn new(keyword: &str) -> Self {
        Self::default().with_keyword(keyword)
    }

    /// Trimmed keyword; may be empty.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Result ordering.
    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Content filters.
    #[must_use]
    pub const fn filters(&self) -> SearchFilters {
        self.filters
    }

    /// Whether the request would issue a network query.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        !self.keyword.is_empty()
    }

    /// Replace the keyword, trimming surrounding whitespace.
    #[must_use]
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        keyword.trim().clone_into(&mut self.keyword);
        self
    }

    /// Replace the page.
    ///
    /// # Errors
    ///
    /// Returns [`SearchInputError::InvalidPage`] for page 0.
    pub fn with_page(mut self, page: u32) -> Result<Self, SearchInputError> {
        if page == 0 {
            return Err(SearchInputError::InvalidPage(page));
        }
        self.page = page;
        Ok(self)
    }

    /// Replace the sort key.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Replace the filters.
    #[must_use]
    pub const fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Query pairs for the shareable URL. Defaults are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.keyword.clone())];
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.sort != SortKey::default() {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }
        pairs.extend(self.filters.pairs());
        pairs
    }

    /// Encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.query_pairs())
    }

    /// Shareable page URL, e.g. `/search?q=ubuntu&sort=health`.
    #[must_use]
    pub fn to_url(&self) -> String {
        format!("{SEARCH_PAGE_PATH}?{}", self.to_query_string())
    }

    /// Rebuild a request from a URL query string (leading `?` optional).
    ///
    /// Absent or invalid `page` becomes 1 and absent or unknown `sort` becomes
    /// `time`; unrelated parameters are ignored.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let mut request = Self::default();
        for (name, value) in parse_pairs(query) {
            match name.as_str() {
                "q" => request = request.with_keyword(&value),
                "page" => {
                    request.page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(1);
                }
                "sort" => request.sort = SortKey::parse(&value).unwrap_or_default(),
                "has_video" => request.filters.has_video = parse_flag(&value),
                "has_audio" => request.filters.has_audio = parse_flag(&value),
                _ => {}
            }
        }
        request
    }
}

/// Network query for one dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    /// Request being fetched.
    pub request: SearchRequest,
    /// Page size sent as `limit`.
    pub limit: u32,
    /// Key sent as `api_key`.
    pub api_key: String,
}

impl SearchQuery {
    /// Build the query for `request` using the site's paging and key.
    #[must_use]
    pub fn new(request: SearchRequest, config: &SiteConfig) -> Self {
        Self {
            request,
            limit: config.page_size.clamp(1, config.max_page_size.max(1)),
            api_key: config.api_key.clone(),
        }
    }

    /// Path and query for `GET /api/search`.
    #[must_use]
    pub fn to_path(&self) -> String {
        let request = &self.request;
        let mut pairs = vec![
            ("q", request.keyword.clone()),
            ("page", request.page.to_string()),
            ("sort", request.sort.as_str().to_string()),
            ("limit", self.limit.to_string()),
        ];
        pairs.extend(request.filters.pairs());
        pairs.push(("api_key", self.api_key.clone()));
        format!("{SEARCH_API_PATH}?{}", encode_pairs(&pairs))
    }
}

/// Decoded value of the first `name` parameter in a URL query string.
#[must_use]
pub fn query_param(query: &str, name: &str) -> Option<String> {
    parse_pairs(query).find_map(|(key, value)| (key == name).then_some(value))
}

fn encode_pairs(pairs: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (index, (name, value)) in pairs.iter().enumerate() {
        if index > 0 {
            out.push('&');
        }
        let _ = write!(out, "{name}={}", urlencoding::encode(value));
    }
    out
}

fn parse_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_component(name), decode_component(value))
        })
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), std::borrow::Cow::into_owned)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keyword_is_trimmed() {
        assert_eq!(SearchRequest::new("  ubuntu  ").keyword(), "ubuntu");
        assert!(!SearchRequest::new("   ").is_searchable());
    }

    #[test]
    fn page_zero_is_rejected() {
        assert_eq!(
            SearchRequest::new("x").with_page(0),
            Err(SearchInputError::InvalidPage(0))
        );
        assert_eq!(SearchRequest::new("x").with_page(3).unwrap().page(), 3);
    }

    #[test]
    fn absent_page_and_sort_take_defaults() {
        let request = SearchRequest::from_query_string("?q=ubuntu");
        assert_eq!(request.keyword(), "ubuntu");
        assert_eq!(request.page(), 1);
        assert_eq!(request.sort(), SortKey::Time);
    }

    #[test]
    fn invalid_page_and_sort_fall_back() {
        let request = SearchRequest::from_query_string("q=a&page=0&sort=seeders");
        assert_eq!(request.page(), 1);
        assert_eq!(request.sort(), SortKey::Time);
        let request = SearchRequest::from_query_string("q=a&page=abc");
        assert_eq!(request.page(), 1);
    }

    #[test]
    fn plus_and_percent_escapes_decode() {
        let request = SearchRequest::from_query_string("q=big+buck%20bunny%26co&has_video=true");
        assert_eq!(request.keyword(), "big buck bunny&co");
        assert!(request.filters().has_video);
        assert!(!request.filters().has_audio);
    }

    #[test]
    fn single_parameters_can_be_read() {
        assert_eq!(
            query_param("?q=x&from=big+buck", "from").as_deref(),
            Some("big buck")
        );
        assert_eq!(query_param("q=x", "from"), None);
    }

    #[test]
    fn url_omits_defaults() {
        assert_eq!(SearchRequest::new("ubuntu").to_url(), "/search?q=ubuntu");
        let request = SearchRequest::new("a b")
            .with_sort(SortKey::Health)
            .with_page(2)
            .unwrap();
        assert_eq!(request.to_url(), "/search?q=a%20b&page=2&sort=health");
    }

    #[test]
    fn api_path_carries_every_parameter() {
        let config = SiteConfig {
            api_key: "k".to_string(),
            ..SiteConfig::default()
        };
        let request = SearchRequest::new("ubuntu").with_filters(SearchFilters {
            has_video: true,
            has_audio: true,
        });
        let query = SearchQuery::new(request, &config);
        assert_eq!(
            query.to_path(),
            "/api/search?q=ubuntu&page=1&sort=time&limit=20&has_video=true&has_audio=true&api_key=k"
        );
    }

    fn sort_strategy() -> impl Strategy<Value = SortKey> {
        prop::sample::select(SortKey::all().to_vec())
    }

    proptest! {
        #[test]
        fn url_round_trips(
            keyword in "\\PC{0,24}",
            page in 1u32..10_000,
            sort in sort_strategy(),
            has_video in any::<bool>(),
            has_audio in any::<bool>(),
        ) {
            let request = SearchRequest::new(&keyword)
                .with_page(page)
                .unwrap()
                .with_sort(sort)
                .with_filters(SearchFilters { has_video, has_audio });
            let parsed = SearchRequest::from_query_string(&request.to_query_string());
            prop_assert_eq!(parsed, request);
        }
    }
}
