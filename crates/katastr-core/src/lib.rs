pub mod config;
pub mod error;

pub use config::{
    CacheBackendKind, CacheConfig, Config, CorsConfig, ServerConfig, UpstreamConfig,
    ValidationResult,
};
pub use error::ConfigError;

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
