//! Shared services for the betting assistant

pub mod cache;
pub mod metrics;
pub mod retry;
pub mod sports_data;
pub mod upstream_errors;

pub use cache::{CacheCategory, CacheStats, CacheTtls, ResponseCache};
pub use metrics::{Metrics, MetricsSnapshot};
pub use retry::{with_retry, RetryConfig};
pub use sports_data::SportsDataClient;
pub use upstream_errors::{classify, normalize, DisplayMessage, ErrorKind, UpstreamError};
