//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle + transport produce:
//!     → tracing events (structured fields, initialized by the binary)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap (atomic increments); always on
//! - The Prometheus exporter is opt-in via `metrics.enabled`

pub mod metrics;
