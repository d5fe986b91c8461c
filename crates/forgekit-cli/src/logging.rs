//! stderr tracing setup for the `forgekit` binary.
//!
//! stdout is reserved for resolved configs and JSON reports, so every log
//! line goes to stderr. The core crate only emits events and never installs
//! a subscriber.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose level follows `-v`. Everything else follows `RUST_LOG`.
const OWN_CRATES: &[&str] = &["forgekit", "forgekit_core"];

/// Level for forgekit's own events given the number of `-v` flags.
fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. With `json`, each event is one JSON object
/// per line carrying the enclosing command span (`cmd`, `cwd`).
///
/// Must be called once per process; a second call panics.
pub fn init(verbosity: u8, json: bool) {
    let level = level_for(verbosity);

    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    for krate in OWN_CRATES {
        if let Ok(directive) = format!("{krate}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
