use crate::utils::error::{EtlError, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name for a run started at `started`, e.g. `2025-01-31_14-05-09.log`.
pub fn log_file_name(started: chrono::DateTime<chrono::Local>) -> String {
    format!("{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("top_series_etl=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("top_series_etl=info"))
    }
}

/// Installs the process-wide subscriber: compact console output plus a plain-text
/// copy in `<log_dir>/<start timestamp>.log`. Returns the log file path.
pub fn init_cli_logger(verbose: bool, log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file_name(chrono::Local::now()));
    let file = File::create(&log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| EtlError::ConfigError {
            message: format!("Logger already initialized: {}", e),
        })?;

    Ok(log_path)
}

/// In-memory log sink for asserting on emitted events in tests.
#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub(crate) struct LogCapture {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl LogCapture {
        /// Routes this thread's events into the buffer until the guard is dropped.
        pub(crate) fn install() -> (Self, DefaultGuard) {
            let capture = Self::default();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(capture.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            (capture, guard)
        }

        pub(crate) fn contents(&self) -> String {
            let buffer = self.buffer.lock().unwrap();
            String::from_utf8_lossy(&buffer).into_owned()
        }

        /// True when some line has `level` and contains `needle`.
        pub(crate) fn has_line(&self, level: &str, needle: &str) -> bool {
            self.contents()
                .lines()
                .any(|line| line.contains(level) && line.contains(needle))
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
