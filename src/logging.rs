//! Tracing setup for binaries and examples embedding the client.
//!
//! Libraries only emit spans and events; calling this is the host
//! application's choice. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// One bare level per string: stacked bare directives would all parse, but
// the last one wins as the global default.
const VERBOSE_FILTER: &str = "doomsday_client=debug,info";
const DEFAULT_FILTER: &str = "doomsday_client=info,warn";

/// Initialize a fmt subscriber with env-filter support.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn fallback_filters_parse_with_a_single_global_default() {
        for filter in [VERBOSE_FILTER, DEFAULT_FILTER] {
            assert!(EnvFilter::try_new(filter).is_ok(), "{filter}");
            let bare_levels = filter.split(',').filter(|d| !d.contains('=')).count();
            assert_eq!(bare_levels, 1, "{filter}");
        }
    }
}
