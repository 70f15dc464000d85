use std::fs;
use std::sync::{Once, OnceLock};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

static INIT: Once = Once::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub struct Logger;

impl Logger {
    /// Install the global tracing subscriber: a console layer plus a daily
    /// rolling file under `logs/`. `RUST_LOG` overrides the configured
    /// level. Safe to call more than once; only the first call wins.
    pub fn init(level: &str) {
        let level = level.to_string();
        INIT.call_once(move || {
            if let Err(e) = fs::create_dir_all("logs") {
                eprintln!("Failed to create log directory: {e}");
            }

            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level));

            let file_appender = rolling::daily("logs", "corebank-api.log");
            let (file_writer, guard) = non_blocking(file_appender);
            let _ = FILE_GUARD.set(guard);

            Registry::default()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_timer(UtcTime::rfc_3339())
                        .with_target(true),
                )
                .with(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_ansi(false)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .init();
        });
    }
}
