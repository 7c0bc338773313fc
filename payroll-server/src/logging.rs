//! Process-wide logging for the `payroll` binary.
//!
//! Logs go to stderr so command output on stdout stays clean. The level can
//! be changed after startup (the config file is read after logging is up),
//! and a log file can be attached or detached at any time.

use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Filter used when neither `RUST_LOG` nor a config file sets one.
pub const DEFAULT_DIRECTIVE: &str = "info";

// --- Formatter ---

/// `2026-01-31T09:15:02.117+02:00  INFO payroll_server::api: message k=v`
struct PayrollFmt;

impl<S, N> FormatEvent<S, N> for PayrollFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        if ansi {
            let colour = match *meta.level() {
                Level::ERROR => "31",
                Level::WARN => "33",
                Level::INFO => "32",
                Level::DEBUG => "34",
                Level::TRACE => "35",
            };
            write!(
                writer,
                "\x1b[2m{timestamp}\x1b[0m \x1b[1;{colour}m{:>5}\x1b[0m \x1b[2m{}:\x1b[0m ",
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{timestamp} {:>5} {}: ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type FileHandle = Arc<Mutex<Option<File>>>;

/// Writes to the attached log file, or nowhere while none is attached.
#[derive(Clone)]
struct LogFileSlot(FileHandle);

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileSlot {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(lock(&self.0))
    }
}

/// A writer that panicked mid-record leaves the file usable.
fn lock(handle: &FileHandle) -> MutexGuard<'_, Option<File>> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Statics ---

type ReloadFn = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

static RELOAD_LEVEL: OnceLock<ReloadFn> = OnceLock::new();
static LOG_FILE: OnceLock<FileHandle> = OnceLock::new();

fn parse_directive(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))
}

// --- Public API ---

/// Installs the global subscriber. Call once at startup; later calls are
/// ignored.
///
/// `RUST_LOG` takes precedence over `directive` when it is set.
pub fn init_logging(directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_directive(directive)?,
    };

    let file: FileHandle = Arc::new(Mutex::new(None));
    let (level_filter, level_handle) = reload::Layer::new(filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PayrollFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(PayrollFmt)
        .with_ansi(false)
        .with_writer(LogFileSlot(file.clone()));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = LOG_FILE.set(file);
        let _ = RELOAD_LEVEL.set(Box::new(move |filter| {
            level_handle
                .reload(filter)
                .map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
        }));
    }
    Ok(())
}

/// Replaces the active filter. Accepts a bare level ("warn") or any
/// `EnvFilter` directive ("info,payroll_core=debug").
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = parse_directive(directive)?;
    match RELOAD_LEVEL.get() {
        Some(reload) => reload(filter),
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Appends log records to `path` from now on, replacing any open log file.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match LOG_FILE.get() {
        Some(handle) => {
            *lock(handle) = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Closes the log file, if any.
pub fn disable_file_logging() {
    if let Some(handle) = LOG_FILE.get() {
        *lock(handle) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_directive() {
        assert!(parse_directive("payroll=loud").is_err());
        assert!(parse_directive("info,payroll_core=debug").is_ok());
    }

    #[test]
    fn file_slot_discards_until_a_file_is_attached() {
        let slot = LogFileSlot(Arc::new(Mutex::new(None)));

        let mut writer = slot.make_writer();

        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        assert!(writer.flush().is_ok());
    }
}
