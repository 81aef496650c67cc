//! Feature slices of the search front end.

pub mod search;
pub mod torrents;
