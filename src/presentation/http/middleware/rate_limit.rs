// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use std::sync::OnceLock;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

// Tracker calls arrive once per page view per user; bursts cover login storms.
const TRACKER_PER_SECOND: u64 = 50;
const TRACKER_BURST: u32 = 200;

pub type TrackerRateLimit = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per-caller limit on the tracker endpoints, keyed on the forwarded or peer address.
pub fn tracker_rate_limit_layer() -> TrackerRateLimit {
    static RATE_LIMITER: OnceLock<TrackerRateLimit> = OnceLock::new();

    RATE_LIMITER
        .get_or_init(|| {
            let mut builder = GovernorConfigBuilder::default();
            builder.per_second(TRACKER_PER_SECOND);
            builder.burst_size(TRACKER_BURST);
            let config = builder
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .expect("non-zero rate limit constants");

            GovernorLayer::new(config)
        })
        .clone()
}
