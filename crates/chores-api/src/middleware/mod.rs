//! # HTTP Middleware
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod metrics;
pub mod tracing_layer;
