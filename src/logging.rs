//! Process-wide logger setup for the binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, per-creature decisions and spawner activity at
/// debug level are shown. Otherwise only info and above. `RUST_LOG` still
/// overrides either default.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // A logger may already be installed by an earlier test.
    if let Err(e) = builder.try_init() {
        log::debug!("keeping the existing logger: {e}");
    }
}
