//! Keyword search: request model, state machine and async driver.

pub mod controller;
pub mod pagination;
pub mod request;
pub mod response;
pub mod state;
pub mod title;

pub use controller::{AddressBar, SearchController, SearchTransport};
pub use pagination::{PageSlot, Pagination, page_window};
pub use request::{SearchFilters, SearchInputError, SearchQuery, SearchRequest, query_param};
pub use response::{FetchError, RawResponse, interpret_response};
pub use state::{
    Completion, FetchFailure, FetchState, Generation, SearchOrchestrator, SearchResult,
    SearchTicket,
};
pub use title::{format_count, page_title};
