//! Alias entity: a short identifier mapped to a target URL.

use std::fmt;

use crate::domain::resolver::ResolveError;

/// Partition that holds every alias record.
pub const ALIAS_PARTITION_KEY: &str = "aka";

/// Alias text reserved to signal an invalid or absent alias.
///
/// Never stored and never resolved.
pub const RESERVED_ALIAS: &str = "400";

/// A validated alias row key.
///
/// The only way to obtain one is [`AliasId::parse`], so an empty or reserved
/// alias cannot reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasId(String);

impl AliasId {
    /// Validates raw alias text.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidAlias`] for the empty string and for
    /// [`RESERVED_ALIAS`].
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        if raw.is_empty() || raw == RESERVED_ALIAS {
            return Err(ResolveError::InvalidAlias {
                alias: raw.to_string(),
            });
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AliasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AliasId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Optimistic-concurrency token attached to alias writes.
///
/// Writers never check for conflicting prior state, so the only value is the
/// wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyToken {
    #[default]
    Any,
}

impl ConcurrencyToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "*",
        }
    }
}

/// A stored alias mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    pub partition_key: String,
    pub alias: AliasId,
    pub url: String,
    pub etag: ConcurrencyToken,
}

impl AliasRecord {
    /// Creates a record in the default alias partition.
    pub fn new(alias: AliasId, url: impl Into<String>) -> Self {
        Self {
            partition_key: ALIAS_PARTITION_KEY.to_string(),
            alias,
            url: url.into(),
            etag: ConcurrencyToken::Any,
        }
    }

    /// Builds the record a write of `url` to `alias` stores.
    ///
    /// An existing record is retargeted in place; otherwise a new one is
    /// created in the default partition.
    pub fn publish(existing: Option<Self>, alias: AliasId, url: impl Into<String>) -> Self {
        match existing {
            Some(record) => record.with_url(url),
            None => Self::new(alias, url),
        }
    }

    /// Returns a copy pointing at `url`, keeping partition and row keys.
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self
        }
    }

    /// Row key of the record.
    pub fn row_key(&self) -> &str {
        self.alias.as_str()
    }
}
