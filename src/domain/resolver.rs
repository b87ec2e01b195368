//! Alias resolution state machine.
//!
//! Decides, for one request, between redirecting, creating or updating a record,
//! and rejecting. The resolver never touches storage: the caller looks up the
//! current record, passes it in, and persists whatever comes back.
//!
//! # Decision Order
//!
//! 1. Empty or reserved alias → [`ResolveError::InvalidAlias`]
//! 2. `POST`/`PUT` without the shared secret → [`ResolveError::Unauthorized`]
//! 3. `POST`/`PUT` → [`Resolution::Write`] echoing the submitted URL
//! 4. Any other method, unknown alias → [`ResolveError::NotFound`]
//! 5. Any other method → [`Resolution::Redirect`] to the stored URL

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::authorization::WriteSecret;
use crate::domain::entities::{AliasId, AliasRecord};
use crate::domain::redirect_event::RedirectEvent;

/// Expected rejections produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("alias '{alias}' is empty or reserved")]
    InvalidAlias { alias: String },

    #[error("write to alias '{alias}' is not authorized")]
    Unauthorized { alias: String },

    #[error("alias '{alias}' not found")]
    NotFound { alias: String },
}

/// Request method as seen by the resolver.
///
/// Only `POST` and `PUT` are special-cased; everything else reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Head,
    Post,
    Put,
    Other,
}

impl RequestMethod {
    /// Classifies an HTTP method name. Method names are case-sensitive.
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            _ => Self::Other,
        }
    }

    pub fn is_write(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

/// Inputs of a single resolution.
#[derive(Debug, Clone, Copy)]
pub struct AliasRequest<'a> {
    pub alias: &'a str,
    pub method: RequestMethod,
    /// Value of the `X-Authorization` header, if any.
    pub auth_token: Option<&'a str>,
    /// Raw request body; the target URL on writes.
    pub body: &'a str,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Read path: send the client to the stored URL.
    Redirect {
        location: String,
        event: RedirectEvent,
    },
    /// Write path: persist `record`, then send the client to the submitted URL.
    Write {
        location: String,
        record: AliasRecord,
        created: bool,
    },
}

impl Resolution {
    /// Target of the redirect response.
    pub fn location(&self) -> &str {
        match self {
            Self::Redirect { location, .. } | Self::Write { location, .. } => location,
        }
    }
}

/// Pure alias decision logic.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    secret: WriteSecret,
}

impl AliasResolver {
    pub fn new(secret: WriteSecret) -> Self {
        Self { secret }
    }

    /// Returns true if some token can authorize writes.
    pub fn writes_enabled(&self) -> bool {
        self.secret.is_enabled()
    }

    /// Runs the checks that do not need the stored record.
    ///
    /// Callers use this to reject a request before reading the store.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidAlias`] for an empty or reserved alias
    /// - [`ResolveError::Unauthorized`] for a write without the shared secret
    pub fn precheck(&self, request: &AliasRequest<'_>) -> Result<AliasId, ResolveError> {
        let alias = AliasId::parse(request.alias)?;

        if request.method.is_write() && !self.secret.verify(request.auth_token) {
            return Err(ResolveError::Unauthorized {
                alias: request.alias.to_string(),
            });
        }

        Ok(alias)
    }

    /// Resolves `request` against the record currently stored for its alias.
    ///
    /// # Errors
    ///
    /// See [`Self::precheck`]; additionally [`ResolveError::NotFound`] when a
    /// read finds no record.
    pub fn resolve(
        &self,
        request: &AliasRequest<'_>,
        existing: Option<AliasRecord>,
    ) -> Result<Resolution, ResolveError> {
        self.resolve_at(request, existing, Utc::now())
    }

    /// Same as [`Self::resolve`] with an explicit event timestamp.
    pub fn resolve_at(
        &self,
        request: &AliasRequest<'_>,
        existing: Option<AliasRecord>,
        now: DateTime<Utc>,
    ) -> Result<Resolution, ResolveError> {
        let alias = self.precheck(request)?;

        if request.method.is_write() {
            let created = existing.is_none();
            let record = AliasRecord::publish(existing, alias, request.body);

            return Ok(Resolution::Write {
                location: request.body.to_string(),
                record,
                created,
            });
        }

        let record = existing.ok_or_else(|| ResolveError::NotFound {
            alias: request.alias.to_string(),
        })?;

        let event = RedirectEvent::new(request.alias, &record, now);

        Ok(Resolution::Redirect {
            location: record.url,
            event,
        })
    }
}
