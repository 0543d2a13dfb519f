//! Per-IP rate limiting using the token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Sustained requests per second per client.
const PER_SECOND: u64 = 2;
/// Requests a client may burst before throttling.
const BURST_SIZE: u32 = 30;

type IpGovernorLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn governor<K: KeyExtractor>(key_extractor: K) -> IpGovernorLayer<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(PER_SECOND)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies the API rate limiter to `router`.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 30 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy` the client IP comes from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`, falling back to the peer address. Otherwise
/// only the socket peer address is used, so clients cannot spoof it.
/// Both require the service to be served with connect info.
pub fn apply(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(governor(SmartIpKeyExtractor))
    } else {
        router.layer(governor(PeerIpKeyExtractor))
    }
}
