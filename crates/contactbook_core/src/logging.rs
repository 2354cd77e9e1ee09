//! Core logging bootstrap and safety policy.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Emit stable, metadata-only diagnostic events from core.
//!
//! # Invariants
//! - Logging init is idempotent for the same directory.
//! - Logging initialization must not panic.
//! - Re-initialization with a different directory is rejected.
//! - Contact field values (names, numbers, emails) never reach the log.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "contactbook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    logger: LoggerHandle,
}

/// Initializes core logging with level and directory.
///
/// Returns `Ok(())` when logging is active, or a human-readable error string
/// when initialization fails.
///
/// # Invariants
/// - Repeating the call with the same `level` and `log_dir` is a no-op.
/// - A different `level` or `log_dir` after the first success is rejected.
/// - Initialization never panics.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - The logger backend fails to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let log_dir = parse_log_dir(log_dir)?;

    if let Some(state) = LOGGING_STATE.get() {
        return state.ensure_matches(level, &log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| start_file_logger(level, &log_dir))?;
    // Another thread may have won the race with a different config.
    state.ensure_matches(level, &log_dir)
}

/// Writes buffered log lines to disk. No-op before `init_logging`.
///
/// Short-lived front ends (the CLI) call this before exiting.
pub fn flush_logging() {
    if let Some(state) = LOGGING_STATE.get() {
        state.logger.flush();
    }
}

impl LoggingState {
    fn ensure_matches(&self, level: &str, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

fn start_file_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let logger = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} debug_build={} version={}",
        std::env::consts::OS,
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} log_dir={}",
        level,
        log_dir.display()
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        logger,
    })
}

/// Returns `(level, log_dir)` of the active logger, `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> Result<&'static str, String> {
    let trimmed = raw.trim();
    let unsupported =
        || format!("unsupported log level `{trimmed}`; expected trace|debug|info|warn|error");
    if trimmed.eq_ignore_ascii_case("warning") {
        return Ok("warn");
    }

    match trimmed.parse::<LevelFilter>().map_err(|_| unsupported())? {
        LevelFilter::Off => Err(unsupported()),
        LevelFilter::Error => Ok("error"),
        LevelFilter::Warn => Ok("warn"),
        LevelFilter::Info => Ok("info"),
        LevelFilter::Debug => Ok("debug"),
        LevelFilter::Trace => Ok("trace"),
    }
}

fn parse_log_dir(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw.trim());
    if path.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if path.is_relative() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            path.display()
        ));
    }
    Ok(path)
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // The payload may quote contact input, so only its size is logged.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload_chars={}",
            location,
            panic_payload_len(panic_info.payload())
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_len(payload: &(dyn std::any::Any + Send)) -> usize {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.chars().count()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.chars().count()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        flush_logging, init_logging, logging_status, panic_payload_len, parse_level,
        parse_log_dir,
    };
    use crate::model::contact::NewContact;
    use crate::service::contact_store::ContactStore;
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn read_logs(dir: &Path) -> String {
        let mut text = String::new();
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_file() {
                text.push_str(&std::fs::read_to_string(path).unwrap());
            }
        }
        text
    }

    #[test]
    fn level_and_dir_inputs_are_checked() {
        assert_eq!(parse_level(" INFO "), Ok("info"));
        assert_eq!(parse_level("Warning"), Ok("warn"));
        assert!(parse_level("off").is_err());
        assert!(parse_level("verbose").is_err());

        assert!(parse_log_dir("   ").unwrap_err().contains("empty"));
        assert!(parse_log_dir("logs/dev").unwrap_err().contains("absolute"));
    }

    #[test]
    fn panic_payload_is_reduced_to_its_length() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("Ann 12345".to_string());
        assert_eq!(panic_payload_len(payload.as_ref()), 9);
        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(panic_payload_len(payload.as_ref()), 0);
    }

    // Logging is process-global, so every init assertion lives in this one test.
    #[test]
    fn contact_writes_log_events_without_field_values() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let log_dir = std::env::temp_dir().join(format!(
            "contactbook-logging-{}-{nanos}",
            std::process::id()
        ));
        let log_dir_str = log_dir.to_str().unwrap().to_string();

        init_logging("info", &log_dir_str).unwrap();
        init_logging("INFO", &log_dir_str).unwrap();
        assert!(init_logging("debug", &log_dir_str)
            .unwrap_err()
            .contains("refusing to switch"));
        let other_dir = log_dir.with_extension("other");
        assert!(init_logging("info", other_dir.to_str().unwrap())
            .unwrap_err()
            .contains("refusing to switch"));
        assert_eq!(logging_status(), Some(("info", log_dir.clone())));

        let name = "Zephyrine Quillfeather";
        let mobile = "70553190642";
        let email = "zephyrine.q@contact.example";
        let description = "met at the harbour market";
        let store = ContactStore::open_in_memory().unwrap();
        let id = store
            .insert(&NewContact::new(name, mobile, email, description))
            .unwrap();
        assert!(store.delete(id).unwrap());
        // Rejected writes are reported by the caller, not by the store.
        assert!(store.insert(&NewContact::new("", mobile, email, "")).is_err());
        flush_logging();

        let logs = read_logs(&log_dir);
        assert!(logs.contains("event=logging_init"));
        assert!(logs.contains("event=contact_insert"));
        assert!(logs.contains(&format!("event=contact_delete module=service status=ok contact_id={id}")));
        assert!(!logs.contains("event=contact_insert module=service status=error"));
        for value in [name, mobile, email, description] {
            assert!(!logs.contains(value), "log leaked `{value}`");
        }
    }
}
