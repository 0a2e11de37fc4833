//! Trait definitions for catalog operations.
//!
//! Entity types implement the traits they support, keeping the request and
//! mapping details next to the type they produce.

mod search;

pub use search::Search;
