//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! auth pipeline, whois client, HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (decision counters, lookup latency)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Failure detail goes to the operator log only, never to the caller
//! - Request ID is attached to every decision log line
//! - Metrics are recorded unconditionally; without an exporter they are no-ops

pub mod logging;
pub mod metrics;
