use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Where log events go for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Interactive TUI: the terminal is taken, so only a log file is used
    Tui,
    /// One-shot command: warnings also go to stderr
    Cli,
}

/// Install the global subscriber.
///
/// With `log_file` set, DEBUG and above are appended to it. CLI runs also
/// print WARN and above to stderr. Calling this twice is a no-op.
pub fn init_logging(log_file: Option<&Path>, target: LogTarget) -> Result<(), std::io::Error> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    let stderr_layer = (target == LogTarget::Cli).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .with_filter(LevelFilter::WARN)
    });

    // Err only when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    Ok(())
}
