use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{fmt::format::Format, EnvFilter};

/// Installs the global log subscriber.
///
/// # Arguments
///
/// * `level` - the minimum [level](LevelFilter) of the events to write
///
/// # Remarks
///
/// Directives in the `RUST_LOG` environment variable are applied in addition to `level`.
pub fn setup_logger(level: LevelFilter) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let format = Format::default().with_level(true).with_target(false);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(format)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("logger has already been set up");
    }
}
