//! Shared write secret and token verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation key for secret digests.
const DIGEST_KEY: &[u8] = b"link-redirector/x-authorization";

/// The single secret that authorizes alias writes.
///
/// Only an HMAC-SHA256 digest of the secret is kept in memory, and tokens are
/// checked with the constant-time comparison of [`Mac::verify_slice`]. An unset
/// or empty secret rejects every token.
#[derive(Clone)]
pub struct WriteSecret {
    digest: Option<Vec<u8>>,
}

impl WriteSecret {
    /// Builds the secret from configuration.
    pub fn new(secret: Option<&str>) -> Self {
        let digest = secret
            .filter(|s| !s.is_empty())
            .and_then(|s| digest(s.as_bytes()));

        Self { digest }
    }

    /// A secret that rejects every token.
    pub fn disabled() -> Self {
        Self { digest: None }
    }

    /// Returns true if writes can ever be authorized.
    pub fn is_enabled(&self) -> bool {
        self.digest.is_some()
    }

    /// Checks a presented token against the secret.
    pub fn verify(&self, token: Option<&str>) -> bool {
        let (Some(expected), Some(token)) = (&self.digest, token) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(DIGEST_KEY) else {
            return false;
        };
        mac.update(token.as_bytes());
        mac.verify_slice(expected).is_ok()
    }
}

impl fmt::Debug for WriteSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSecret")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn digest(secret: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(DIGEST_KEY).ok()?;
    mac.update(secret);
    Some(mac.finalize().into_bytes().to_vec())
}
