//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client, adapter and middlewares produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr via tracing-subscriber
//!     → whatever `metrics` recorder the host application installs
//! ```

pub mod logging;
pub mod metrics;
