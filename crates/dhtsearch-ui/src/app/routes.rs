//! Routing definitions for the search front end.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/search")]
    Search,
    #[at("/torrent/:hash")]
    Torrent { hash: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}
