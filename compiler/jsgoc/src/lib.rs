//! Compilation unit driver.
//!
//! A unit is one package. [`compile_unit`] asks a [`DeclEmitter`] for the
//! code of each seed declaration, keeps emitting the instances those
//! declarations reach until nothing new turns up, and drops everything the
//! configured [`EntryPoints`] cannot reach. Units share only the front-end
//! `Universe` and `TypeInterner`, so [`compile_units`] runs them in
//! parallel.

use std::sync::Once;

mod driver;
mod error;
mod minify;
mod options;

pub use driver::{compile_unit, compile_units, DeclEmitter, UnitInput, UnitOutput};
pub use error::DriverError;
pub use minify::remove_whitespace;
pub use options::{CompileOptions, EntryPoints};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=jsgo_dce=debug,jsgoc=trace jsgo build ./app
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
