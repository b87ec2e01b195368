//! HTTP layer for the alias redirector.
//!
//! Translates requests into [`crate::application::services::AliasService`]
//! calls and results into redirect or error responses.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies for auxiliary endpoints
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and request tracing
//! - [`routes`] - Alias route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
