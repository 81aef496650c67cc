//! Search state machine.
//!
//! # Design
//! - Every dispatch gets a fresh generation; only the newest one may commit.
//! - Stale completions are dropped without touching state or raising
//!   notifications. In-flight requests are never cancelled.
//! - Pure and synchronous: the async driver lives in `controller`.

use super::request::{SearchFilters, SearchInputError, SearchRequest};
use super::response::FetchError;
use crate::i18n::LocaleResolver;
use dhtsearch_api_models::{SearchResponse, SortKey, TorrentSummary};

/// Generation counter value identifying one dispatch.
pub type Generation = u64;

/// One page of results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResult {
    /// Rows in server order.
    pub items: Vec<TorrentSummary>,
    /// Matches across all pages.
    pub total_count: u64,
    /// Pages at the requested size.
    pub total_pages: u64,
}

impl From<SearchResponse> for SearchResult {
    fn from(response: SearchResponse) -> Self {
        Self {
            items: response.results,
            total_count: response.total,
            total_pages: response.total_pages,
        }
    }
}

/// Committed failure, already translated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
    /// Message shown in place of results.
    pub message: String,
}

/// Lifecycle of the current search.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState {
    /// No keyword; nothing shown.
    #[default]
    Idle,
    /// A request for the current generation is in flight.
    Loading,
    /// Results for the current request.
    Success(SearchResult),
    /// The current request failed.
    Failure(FetchFailure),
}

impl FetchState {
    /// Total matches when results are shown, otherwise 0.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        match self {
            Self::Success(result) => result.total_count,
            _ => 0,
        }
    }
}

/// Permission to fetch `request`; commit the outcome with its generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    /// Generation the outcome must match to commit.
    pub generation: Generation,
    /// Request to fetch.
    pub request: SearchRequest,
}

/// What [`SearchOrchestrator::complete`] did with an outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Results committed.
    Applied,
    /// Failure committed with this message.
    Failed(String),
    /// A newer generation exists; the outcome was discarded.
    Stale,
}

/// Owns the current request and its fetch state.
#[derive(Debug)]
pub struct SearchOrchestrator {
    request: SearchRequest,
    dispatched: Option<SearchRequest>,
    generation: Generation,
    state: FetchState,
    max_keyword_len: usize,
}

impl SearchOrchestrator {
    /// Idle orchestrator accepting keywords up to `max_keyword_len` characters.
    #[must_use]
    pub fn new(max_keyword_len: usize) -> Self {
        Self {
            request: SearchRequest::default(),
            dispatched: None,
            generation: 0,
            state: FetchState::Idle,
            max_keyword_len,
        }
    }

    /// Current request.
    #[must_use]
    pub const fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Current fetch state.
    #[must_use]
    pub const fn state(&self) -> &FetchState {
        &self.state
    }

    /// Newest generation handed out.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Align with `request`, typically parsed from the address bar.
    ///
    /// An empty keyword clears results and invalidates anything in flight. A
    /// request equal to the last dispatched one is a no-op unless that fetch
    /// failed; anything else starts a new generation and returns its ticket.
    pub fn sync(&mut self, request: SearchRequest) -> Option<SearchTicket> {
        if !request.is_searchable() {
            if self.dispatched.is_some() || self.state != FetchState::Idle {
                self.generation += 1;
                tracing::debug!(generation = self.generation, "search cleared");
            }
            self.request = request;
            self.dispatched = None;
            self.state = FetchState::Idle;
            return None;
        }
        let failed = matches!(self.state, FetchState::Failure(_));
        if !failed && self.dispatched.as_ref() == Some(&request) {
            self.request = request;
            return None;
        }
        self.generation += 1;
        self.request = request.clone();
        self.dispatched = Some(request.clone());
        self.state = FetchState::Loading;
        tracing::debug!(
            generation = self.generation,
            keyword = request.keyword(),
            page = request.page(),
            sort = request.sort().as_str(),
            "search dispatched"
        );
        Some(SearchTicket {
            generation: self.generation,
            request,
        })
    }

    /// Commit the outcome of the fetch for `generation`.
    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<SearchResult, FetchError>,
        locale: &LocaleResolver,
    ) -> Completion {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale search response"
            );
            return Completion::Stale;
        }
        match outcome {
            Ok(result) => {
                tracing::debug!(
                    generation,
                    total = result.total_count,
                    rows = result.items.len(),
                    "search results applied"
                );
                self.state = FetchState::Success(result);
                Completion::Applied
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "search failed");
                let message = err.user_message(locale);
                self.state = FetchState::Failure(FetchFailure {
                    message: message.clone(),
                });
                Completion::Failed(message)
            }
        }
    }

    /// Validate a keyword typed into the search box.
    ///
    /// The returned request keeps the current sort and filters and starts at
    /// page 1. State is untouched either way.
    ///
    /// # Errors
    ///
    /// Returns [`SearchInputError::EmptyKeyword`] for blank input and
    /// [`SearchInputError::KeywordTooLong`] past the configured length.
    pub fn submit_keyword(&self, raw: &str) -> Result<SearchRequest, SearchInputError> {
        let keyword = raw.trim();
        if keyword.is_empty() {
            return Err(SearchInputError::EmptyKeyword);
        }
        if keyword.chars().count() > self.max_keyword_len {
            return Err(SearchInputError::KeywordTooLong {
                max: self.max_keyword_len,
            });
        }
        self.request.clone().with_keyword(keyword).with_page(1)
    }

    /// Current request moved to `page`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchInputError::InvalidPage`] for page 0.
    pub fn page_request(&self, page: u32) -> Result<SearchRequest, SearchInputError> {
        self.request.clone().with_page(page)
    }

    /// Current request re-sorted, back on page 1.
    #[must_use]
    pub fn sort_request(&self, sort: SortKey) -> SearchRequest {
        Self::first_page(self.request.clone().with_sort(sort))
    }

    /// Current request re-filtered, back on page 1.
    #[must_use]
    pub fn filter_request(&self, filters: SearchFilters) -> SearchRequest {
        Self::first_page(self.request.clone().with_filters(filters))
    }

    fn first_page(request: SearchRequest) -> SearchRequest {
        match request.clone().with_page(1) {
            Ok(first) => first,
            Err(_) => request,
        }
    }
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new(crate::config::SiteConfig::default().max_keyword_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MemoryLocaleStore;

    fn locale() -> LocaleResolver {
        LocaleResolver::new(MemoryLocaleStore::default())
    }

    fn result(total: u64) -> SearchResult {
        SearchResult {
            items: Vec::new(),
            total_count: total,
            total_pages: total.div_ceil(20),
        }
    }

    #[test]
    fn first_sync_dispatches() {
        let mut orchestrator = SearchOrchestrator::default();
        let ticket = orchestrator.sync(SearchRequest::new("ubuntu")).unwrap();
        assert_eq!(ticket.generation, 1);
        assert_eq!(orchestrator.state(), &FetchState::Loading);
    }

    #[test]
    fn equal_request_is_not_refetched() {
        let mut orchestrator = SearchOrchestrator::default();
        orchestrator.sync(SearchRequest::new("ubuntu"));
        assert!(orchestrator.sync(SearchRequest::new("ubuntu")).is_none());
        assert_eq!(orchestrator.generation(), 1);
    }

    #[test]
    fn empty_keyword_goes_idle_and_invalidates() {
        let mut orchestrator = SearchOrchestrator::default();
        let ticket = orchestrator.sync(SearchRequest::new("ubuntu")).unwrap();
        assert!(orchestrator.sync(SearchRequest::new("")).is_none());
        assert_eq!(orchestrator.state(), &FetchState::Idle);

        let completion = orchestrator.complete(ticket.generation, Ok(result(5)), &locale());
        assert_eq!(completion, Completion::Stale);
        assert_eq!(orchestrator.state(), &FetchState::Idle);
    }

    #[test]
    fn only_latest_generation_commits() {
        let mut orchestrator = SearchOrchestrator::default();
        let first = orchestrator.sync(SearchRequest::new("a")).unwrap();
        let second = orchestrator.sync(SearchRequest::new("b")).unwrap();

        assert_eq!(
            orchestrator.complete(second.generation, Ok(result(2)), &locale()),
            Completion::Applied
        );
        assert_eq!(
            orchestrator.complete(first.generation, Ok(result(1)), &locale()),
            Completion::Stale
        );
        assert_eq!(orchestrator.state().total_count(), 2);
    }

    #[test]
    fn failure_keeps_server_message() {
        let mut orchestrator = SearchOrchestrator::default();
        let ticket = orchestrator.sync(SearchRequest::new("a")).unwrap();
        let err = FetchError::Status {
            status: 500,
            detail: Some("rate limited".to_string()),
        };
        let completion = orchestrator.complete(ticket.generation, Err(err), &locale());
        assert_eq!(completion, Completion::Failed("rate limited".to_string()));
        assert_eq!(
            orchestrator.state(),
            &FetchState::Failure(FetchFailure {
                message: "rate limited".to_string()
            })
        );
    }

    #[test]
    fn transport_failure_uses_generic_message() {
        let mut orchestrator = SearchOrchestrator::default();
        let ticket = orchestrator.sync(SearchRequest::new("a")).unwrap();
        let err = FetchError::Transport("offline".to_string());
        let completion = orchestrator.complete(ticket.generation, Err(err), &locale());
        assert_eq!(
            completion,
            Completion::Failed("Something went wrong, please try again later".to_string())
        );
    }

    #[test]
    fn same_request_is_retried_after_failure() {
        let mut orchestrator = SearchOrchestrator::default();
        let ticket = orchestrator.sync(SearchRequest::new("a")).unwrap();
        let err = FetchError::Transport("offline".to_string());
        orchestrator.complete(ticket.generation, Err(err), &locale());

        let retry = orchestrator.sync(SearchRequest::new("a")).unwrap();
        assert_eq!(retry.generation, 2);
        assert_eq!(orchestrator.state(), &FetchState::Loading);
        assert!(orchestrator.sync(SearchRequest::new("a")).is_none());

        orchestrator.complete(retry.generation, Ok(result(1)), &locale());
        assert!(orchestrator.sync(SearchRequest::new("a")).is_none());
        assert_eq!(orchestrator.generation(), 2);
    }

    #[test]
    fn submit_validates_and_resets_page() {
        let mut orchestrator = SearchOrchestrator::new(5);
        let request = SearchRequest::new("old")
            .with_sort(SortKey::Size)
            .with_page(4)
            .unwrap();
        orchestrator.sync(request);

        assert_eq!(
            orchestrator.submit_keyword("   "),
            Err(SearchInputError::EmptyKeyword)
        );
        assert_eq!(
            orchestrator.submit_keyword("toolong"),
            Err(SearchInputError::KeywordTooLong { max: 5 })
        );
        let next = orchestrator.submit_keyword(" new ").unwrap();
        assert_eq!(next.keyword(), "new");
        assert_eq!(next.page(), 1);
        assert_eq!(next.sort(), SortKey::Size);
        assert_eq!(orchestrator.request().keyword(), "old");
    }

    #[test]
    fn sort_and_filter_changes_return_to_first_page() {
        let mut orchestrator = SearchOrchestrator::default();
        orchestrator.sync(SearchRequest::new("a").with_page(3).unwrap());
        assert_eq!(orchestrator.sort_request(SortKey::Hot).page(), 1);
        let filtered = orchestrator.filter_request(SearchFilters {
            has_video: true,
            has_audio: false,
        });
        assert_eq!(filtered.page(), 1);
        assert!(filtered.filters().has_video);
        assert_eq!(
            orchestrator.page_request(0),
            Err(SearchInputError::InvalidPage(0))
        );
    }
}
