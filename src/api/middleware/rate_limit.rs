//! Per-IP rate limiting using the token bucket algorithm.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Rate limiter applied to every route.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter keyed by the socket peer address.
///
/// The bucket holds at most `burst` tokens and replenishes one token every
/// `per_second` seconds (the replenish interval of `tower_governor`).
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// The server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()` for the peer address to
/// be available.
///
/// # Errors
///
/// Returns an error if either value is zero.
pub fn layer(per_second: u64, burst: u32) -> Result<RateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst)
        .finish()
        .context("Invalid rate limit configuration")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}
