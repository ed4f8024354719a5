//! Client for the CUZK cadastral registry REST API.
//!
//! Every call is paced by a shared token bucket and retried with exponential
//! backoff on transient failures.

pub mod buildings;
pub mod client;
pub mod error;
pub mod parcels;
pub mod proceedings;
pub mod rate_limit;
pub mod retry;
pub mod types;
pub mod units;

pub use client::{ClientConfig, CuzkClient, UpstreamRequest, CUZK_API_BASE, DEFAULT_TIMEOUT_SECS};
pub use error::CuzkError;
pub use rate_limit::RateLimiter;
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
pub use types::*;
