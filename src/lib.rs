pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod presentation;
pub mod token;
pub mod view;

use tracing_subscriber::EnvFilter;

pub use api::QueueApiClient;
pub use error::FetchError;
pub use view::{QueueView, ViewOptions, ViewPhase, ViewState};

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// built-in default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
