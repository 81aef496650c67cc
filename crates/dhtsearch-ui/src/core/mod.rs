//! Core UI plumbing shared by every feature.

pub mod notify;
pub mod surface;
