use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to a `tracing` filter directive.
///
/// Unrecognised names are passed through unchanged, so raw `EnvFilter`
/// directives such as `study_data=debug` also work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber, writing to stderr so stdout
/// carries only the report.
///
/// Falls back to `"info"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Logo discovery ─────────────────────────────────────────────────────────────

/// Resolve the logo path.
///
/// Checks, in order:
/// 1. `logo` as given (absolute, or relative to the working directory).
/// 2. The file of the same name inside `data_dir`.
///
/// Returns `logo` unchanged when neither exists, leaving the caller to report
/// the missing file.
pub fn locate_logo(logo: &Path, data_dir: &Path) -> PathBuf {
    if logo.is_file() {
        return logo.to_path_buf();
    }
    if let Some(name) = logo.file_name() {
        let candidate = data_dir.join(name);
        if candidate.is_file() {
            return candidate;
        }
    }
    logo.to_path_buf()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
