//! Library layer for the dashboard: secured API client, list pipeline,
//! formatting and fetch hooks.
//!
//! Wraps the `dashboard_api` transport with authentication, client
//! identification, request signing, per-client rate limiting and retries,
//! and provides the search/filter/sort/paginate pipeline used by table views.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod format;
pub mod pipeline;
pub mod procurement;
pub mod products;
pub mod rate_limiter;
pub mod signing;
pub mod storage;

pub use dashboard_api;
pub use dashboard_api::types;
pub use dashboard_api::{ProcurementQuery, ProductQuery, ProductSortBy, Query, SortDirection};

pub use client::{RetryConfig, SecureClient, SecureClientBuilder, SessionEvent};
pub use config::{ApiConfig, Environment};
pub use error::{ApiErrorInfo, DashboardError};
pub use fetch::{Action, ActionState, Resource, ResourceState};
pub use pipeline::{ListQuery, Page, Record, SortConfig};
pub use rate_limiter::{RateLimitStats, RateLimiter};
pub use signing::RequestSigner;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
