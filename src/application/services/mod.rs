//! Business logic services for the application layer.

pub mod expiry_service;
pub mod link_service;

pub use expiry_service::ExpiryService;
pub use link_service::{LinkConfig, LinkService};
