//! Cross-cutting building blocks for the vip-core connector.
//!
//! This crate provides:
//! - Transport error types with retryability classification
//! - HTTP client configuration and building
//! - A fixed-delay retry policy
//! - A time-to-live cache with passive expiration
//! - Cache metrics in Prometheus text format
//! - Tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod http;
pub mod metrics;
pub mod retry;
pub mod tracing_config;

pub use cache::TtlCache;
pub use error::TransportError;
pub use http::{HttpConfig, build_http_client};
pub use metrics::{CacheMetrics, Metric, MetricKind};
pub use retry::{RetryConfig, RetryPolicy};
pub use tracing_config::{TracingConfig, init_tracing};
