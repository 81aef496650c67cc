//! Yew components for the search front end.

pub(crate) mod locale_menu;
pub(crate) mod pagination;
pub(crate) mod search_box;
pub(crate) mod search_page;
pub(crate) mod toast;
pub(crate) mod torrent_card;
pub(crate) mod torrent_page;
