use std::sync::Once;

use env_logger::{Builder, Env};
use log::LevelFilter;

static INIT: Once = Once::new();

/// Maps a `-v` count onto a level, starting from `warn`.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs `env_logger` for the whole process. `RUST_LOG` wins over `default_level`.
/// Later calls are no-ops.
pub fn initialize_logger(default_level: LevelFilter) {
    INIT.call_once(|| {
        let env = Env::default().default_filter_or(default_level.as_str());
        // A test harness may have installed its own backend already.
        let _ = Builder::from_env(env).format_timestamp_millis().try_init();
    });
}
