//! HTTP request handlers.

pub mod alias;
pub mod health;

pub use alias::{alias_handler, empty_alias_handler};
pub use health::health_handler;
