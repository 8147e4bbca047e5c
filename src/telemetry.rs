//! Telemetry metric name constants.
//!
//! Centralised metric names for pandu operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `pandu_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `kind` — cached entity kind ("gedung" | "unit")
//! - `operation` — origin endpoint invoked ("nearby" | "gedung" | "unit")
//! - `status` — outcome: "ok" or "error"

/// Total result-cache hits.
///
/// Labels: `kind`.
pub const CACHE_HITS_TOTAL: &str = "pandu_cache_hits_total";

/// Total result-cache misses. Degraded-state lookups count as misses.
///
/// Labels: `kind`.
pub const CACHE_MISSES_TOTAL: &str = "pandu_cache_misses_total";

/// Total requests dispatched to the directory origin API.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const ORIGIN_REQUESTS_TOTAL: &str = "pandu_origin_requests_total";

/// Total chat updates received from the transport.
///
/// Labels: `kind` ("message" | "callback").
pub const UPDATES_TOTAL: &str = "pandu_updates_total";
