//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::sync::Mutex;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// When `config.file` is set, logs are appended to that file instead of stderr.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if let Some(path) = &config.file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let builder = fmt::Subscriber::builder()
                    .with_env_filter(env_filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file));
                if config.json {
                    tracing::subscriber::set_global_default(builder.json().finish()).ok();
                } else {
                    tracing::subscriber::set_global_default(builder.finish()).ok();
                }
                return;
            }
            Err(e) => {
                eprintln!("Failed to open log file {}: {e}", path.display());
            }
        }
    }

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
