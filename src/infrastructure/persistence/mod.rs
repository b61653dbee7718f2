//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx
//! prepared statements.

pub mod pg_short_link_repository;

pub use pg_short_link_repository::PgShortLinkRepository;
