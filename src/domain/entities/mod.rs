//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without infrastructure dependencies.
//! Creation uses the "New Type" pattern: [`NewShortLink`] carries the fields
//! a caller controls; the store assigns the rest on insert.

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink};
