//! Async driver for the search page.
//!
//! # Design
//! - The orchestrator sits in `Rc<RefCell<_>>`; borrows end before every
//!   `.await`, so overlapping dispatches on one thread never conflict.
//! - Network access and URL writes go through [`SearchTransport`] and
//!   [`AddressBar`], keeping the browser out of native tests.
//! - Rejected input and committed failures surface on the notification bus.

use super::request::{SearchFilters, SearchInputError, SearchQuery, SearchRequest};
use super::response::{FetchError, RawResponse, interpret_response};
use super::state::{Completion, FetchState, SearchOrchestrator, SearchTicket};
use super::title::page_title;
use crate::config::SiteConfig;
use crate::core::notify::NotificationBus;
use crate::i18n::LocaleResolver;
use dhtsearch_api_models::SortKey;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

/// Issues `GET /api/search` for a query.
pub trait SearchTransport {
    /// Fetch one page. Non-2xx statuses are returned as responses, not errors.
    fn search(&self, query: &SearchQuery)
    -> impl Future<Output = Result<RawResponse, FetchError>>;
}

/// Writes the shareable URL for a request.
pub trait AddressBar {
    /// Push the URL for `request` onto the history stack.
    fn push(&self, request: &SearchRequest);
}

type Listener = Rc<dyn Fn()>;

/// Wires the orchestrator to a transport, the address bar, the notification
/// bus and the locale. Clones share all state.
pub struct SearchController<T, A> {
    orchestrator: Rc<RefCell<SearchOrchestrator>>,
    transport: Rc<T>,
    address_bar: Rc<A>,
    bus: NotificationBus,
    locale: LocaleResolver,
    site: Rc<SiteConfig>,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl<T, A> Clone for SearchController<T, A> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Rc::clone(&self.orchestrator),
            transport: Rc::clone(&self.transport),
            address_bar: Rc::clone(&self.address_bar),
            bus: self.bus.clone(),
            locale: self.locale.clone(),
            site: Rc::clone(&self.site),
            listener: Rc::clone(&self.listener),
        }
    }
}

impl<T: SearchTransport, A: AddressBar> SearchController<T, A> {
    /// Idle controller.
    #[must_use]
    pub fn new(
        transport: T,
        address_bar: A,
        bus: NotificationBus,
        locale: LocaleResolver,
        site: SiteConfig,
    ) -> Self {
        Self {
            orchestrator: Rc::new(RefCell::new(SearchOrchestrator::new(site.max_keyword_len))),
            transport: Rc::new(transport),
            address_bar: Rc::new(address_bar),
            bus,
            locale,
            site: Rc::new(site),
            listener: Rc::new(RefCell::new(None)),
        }
    }

    /// Called after every state change.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Transport in use.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Address bar in use.
    #[must_use]
    pub fn address_bar(&self) -> &A {
        &self.address_bar
    }

    /// Current fetch state.
    #[must_use]
    pub fn snapshot(&self) -> FetchState {
        self.orchestrator.borrow().state().clone()
    }

    /// Current request.
    #[must_use]
    pub fn request(&self) -> SearchRequest {
        self.orchestrator.borrow().request().clone()
    }

    /// Document title for the current request and results.
    #[must_use]
    pub fn title(&self) -> String {
        let orchestrator = self.orchestrator.borrow();
        page_title(
            orchestrator.request().keyword(),
            orchestrator.state().total_count(),
            &self.locale,
            &self.site,
        )
    }

    /// Follow the address bar: parse `query` and fetch if it changed.
    pub async fn on_location(&self, query: &str) {
        self.run(SearchRequest::from_query_string(query)).await;
    }

    /// Search for a keyword typed by the user.
    ///
    /// # Errors
    ///
    /// Returns [`SearchInputError`] for blank or overlong input after raising
    /// one warning notification.
    pub async fn submit_keyword(&self, raw: &str) -> Result<(), SearchInputError> {
        let validated = self.orchestrator.borrow().submit_keyword(raw);
        match validated {
            Ok(request) => {
                self.navigate(request).await;
                Ok(())
            }
            Err(err) => {
                self.bus.warning(err.user_message(&self.locale));
                Err(err)
            }
        }
    }

    /// Move to `page` of the current search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchInputError::InvalidPage`] for page 0; nothing is
    /// dispatched.
    pub async fn set_page(&self, page: u32) -> Result<(), SearchInputError> {
        let request = self.orchestrator.borrow().page_request(page)?;
        self.navigate(request).await;
        Ok(())
    }

    /// Re-sort the current search.
    pub async fn set_sort(&self, sort: SortKey) {
        let request = self.orchestrator.borrow().sort_request(sort);
        self.navigate(request).await;
    }

    /// Re-filter the current search.
    pub async fn set_filters(&self, filters: SearchFilters) {
        let request = self.orchestrator.borrow().filter_request(filters);
        self.navigate(request).await;
    }

    async fn navigate(&self, request: SearchRequest) {
        self.address_bar.push(&request);
        self.run(request).await;
    }

    async fn run(&self, request: SearchRequest) {
        let ticket = self.orchestrator.borrow_mut().sync(request);
        self.changed();
        if let Some(ticket) = ticket {
            self.dispatch(ticket).await;
        }
    }

    async fn dispatch(&self, ticket: SearchTicket) {
        let query = SearchQuery::new(ticket.request, &self.site);
        let outcome = match self.transport.search(&query).await {
            Ok(raw) => interpret_response(&raw),
            Err(err) => Err(err),
        };
        let completion =
            self.orchestrator
                .borrow_mut()
                .complete(ticket.generation, outcome, &self.locale);
        match completion {
            Completion::Applied => self.changed(),
            Completion::Failed(message) => {
                self.bus.error(message);
                self.changed();
            }
            Completion::Stale => {}
        }
    }

    fn changed(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notify::{BusSignal, Severity};
    use crate::i18n::MemoryLocaleStore;
    use std::cell::Cell;

    struct FixedTransport {
        response: RawResponse,
        calls: Cell<usize>,
    }

    impl SearchTransport for FixedTransport {
        async fn search(&self, _query: &SearchQuery) -> Result<RawResponse, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.response.clone())
        }
    }

    #[derive(Default)]
    struct NoAddressBar;

    impl AddressBar for NoAddressBar {
        fn push(&self, _request: &SearchRequest) {}
    }

    fn controller(
        status: u16,
        body: &str,
    ) -> (SearchController<FixedTransport, NoAddressBar>, NotificationBus) {
        let bus = NotificationBus::new();
        let transport = FixedTransport {
            response: RawResponse::new(status, body),
            calls: Cell::new(0),
        };
        let controller = SearchController::new(
            transport,
            NoAddressBar,
            bus.clone(),
            LocaleResolver::new(MemoryLocaleStore::default()),
            SiteConfig::default(),
        );
        (controller, bus)
    }

    #[tokio::test]
    async fn repeated_location_fetches_once() {
        let (controller, _bus) = controller(200, r#"{"total": 0}"#);
        controller.on_location("?q=ubuntu").await;
        controller.on_location("?q=ubuntu").await;
        assert_eq!(controller.transport().calls.get(), 1);
    }

    #[tokio::test]
    async fn listener_sees_loading_and_result() {
        let (controller, _bus) = controller(200, r#"{"total": 3}"#);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            let probe = controller.clone();
            controller.set_listener(move || seen.borrow_mut().push(probe.snapshot()));
        }
        controller.on_location("q=x").await;
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], FetchState::Loading);
        assert_eq!(seen[1].total_count(), 3);
    }

    #[tokio::test]
    async fn overlong_keyword_warns() {
        let (controller, bus) = controller(200, "{}");
        let keyword = "k".repeat(101);
        let err = controller.submit_keyword(&keyword).await.unwrap_err();
        assert_eq!(err, SearchInputError::KeywordTooLong { max: 100 });

        let mut feed = bus.attach().unwrap();
        let signals = feed.drain();
        assert_eq!(signals.len(), 1);
        match &signals[0] {
            BusSignal::Raised(notification) => {
                assert_eq!(notification.severity, Severity::Warning);
                assert_eq!(
                    notification.message,
                    "Keywords are limited to 100 characters"
                );
            }
            BusSignal::Dismissed(_) => panic!("unexpected dismissal"),
        }
        assert_eq!(controller.transport().calls.get(), 0);
    }

    #[tokio::test]
    async fn invalid_page_dispatches_nothing() {
        let (controller, _bus) = controller(200, "{}");
        controller.on_location("q=x").await;
        assert_eq!(
            controller.set_page(0).await,
            Err(SearchInputError::InvalidPage(0))
        );
        assert_eq!(controller.transport().calls.get(), 1);
    }
}
