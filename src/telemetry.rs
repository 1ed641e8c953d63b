//! Logging setup.
//!
//! Native: `tracing-subscriber` with an `EnvFilter`, overridable through
//! `RUST_LOG`. Browser: `tracing-wasm` into the devtools console.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info,passkey_ceremony=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();

        if let Err(e) = installed {
            eprintln!("tracing subscriber already installed: {}", e);
        }
    });
}

/// Install the global subscriber. Later calls are no-ops.
#[cfg(target_arch = "wasm32")]
pub fn init_tracing() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}
