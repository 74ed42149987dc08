use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "info,oppidum_app=debug,oppidum_game=debug,oppidum_db=debug";

/// Installs the global tracing subscriber: human-readable output on stdout
/// plus a daily-rotated plain-text copy under `logs/`.
///
/// `RUST_LOG` overrides the default directives, which keep third-party
/// crates at `info` and the oppidum crates at `debug`.
///
/// The returned guard flushes the file writer when dropped, so `main` must
/// hold on to it for the lifetime of the process.
pub fn setup_logging() -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        DEFAULT_DIRECTIVES
            .parse()
            .expect("default log directives are well-formed")
    });

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily("logs", "oppidum.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer())
        .init();

    guard
}
