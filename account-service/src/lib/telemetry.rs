use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::util::TryInitError;

pub const DEFAULT_FILTER: &str = "account_service=debug,auth=info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Fails if a subscriber is already
/// installed, which callers embedding this crate may ignore.
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
