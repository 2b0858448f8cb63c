//! Log setup. Records go to `~/.local/state/sitescript/sitescript.log`, or to
//! stderr when that file can't be used. stdout is left alone: the CLI prints
//! handshake payloads there.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sitescript_core=debug,sitescript_cli=debug";

/// Per-event sink. Each event gets its own handle to the log file; if the
/// handle can't be duplicated the event is written to stderr instead of being
/// dropped.
enum LogSink {
    LogFile(File),
    Stderr,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::LogFile(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::LogFile(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct AppendLog {
    file: File,
}

impl<'a> MakeWriter<'a> for AppendLog {
    type Writer = LogSink;

    fn make_writer(&'a self) -> LogSink {
        match self.file.try_clone() {
            Ok(f) => LogSink::LogFile(f),
            Err(_) => LogSink::Stderr,
        }
    }
}

/// `~/.local/state/sitescript/sitescript.log`; the directory is created.
pub fn log_file_path() -> Result<PathBuf> {
    let state_dir = xdg::BaseDirectories::with_prefix("sitescript")?
        .get_state_home()
        .join("sitescript");
    fs::create_dir_all(&state_dir)
        .with_context(|| format!("create log dir: {}", state_dir.display()))?;
    Ok(state_dir.join("sitescript.log"))
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn install(writer: BoxMakeWriter) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))
}

/// Log to the state-dir file. An Err leaves no subscriber installed, so the
/// caller can still fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file: {}", path.display()))?;

    install(BoxMakeWriter::new(AppendLog { file }))?;
    tracing::info!("sitescript logging to {}", path.display());
    Ok(())
}

/// Log to stderr only.
pub fn init_logging_stderr() {
    let _ = install(BoxMakeWriter::new(io::stderr));
}
