//! Data Transfer Objects for JSON responses.
//!
//! The alias endpoints answer with redirects and have no DTOs; only the
//! health check returns a body.

pub mod health;
