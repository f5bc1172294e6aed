//! Tracing subscriber initialization
//!
//! The core emits structured events; this module is the sink configuration
//! used by the binary. Filter precedence: `NOVA_LOG` environment variable,
//! then `--verbose`, then the global scope's `logging.level`, then `warn`.
//! The global scope is read leniently here; configuration errors surface
//! later through the normal load path, not during logger setup.

use tracing_subscriber::EnvFilter;

use crate::config::{read_scope_file, LogFormat, LoggingConfig, Scope};
use crate::paths::global_config_path;

const DEFAULT_DIRECTIVE: &str = "nova=warn";

/// Install the global tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init(verbose: bool) {
    let configured = global_logging_config();

    let directive = std::env::var("NOVA_LOG")
        .ok()
        .or_else(|| verbose.then(|| "nova=debug".to_string()))
        .or_else(|| configured.as_ref().and_then(|l| l.level.clone()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let format = configured.and_then(|l| l.format);
    let _ = match format {
        Some(LogFormat::Json) => builder.json().try_init(),
        _ => builder.try_init(),
    };
}

fn global_logging_config() -> Option<LoggingConfig> {
    let path = global_config_path().ok()?;
    let loaded = read_scope_file(Scope::Global, &path).ok()??;
    loaded.file.logging
}
