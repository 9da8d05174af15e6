//! src/logging.rs
//! ============================================================================
//! # Logger: file-only tracing setup
//!
//! The terminal belongs to the UI, so events go to a daily rolling file
//! (`<dir>/docflow.log.YYYY-MM-DD`) through a non-blocking writer. Lines use
//! a compact `[SEQ] LEVEL [file:line mod::path] message` format.

use std::{
    path::Path,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::{config::LoggingConfig, error::AppError};

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`. Keep the returned guard alive
    /// for the lifetime of the program so buffered lines are flushed.
    pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, AppError> {
        std::fs::create_dir_all(&config.directory)?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        let file = rolling::daily(&config.directory, "docflow.log");
        let (writer, guard) = tracing_appender::non_blocking(file);

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(Self::env_filter(&config.level)?);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|e| AppError::Logging(e.to_string()))?;

        Ok(guard)
    }

    /// `RUST_LOG` wins; otherwise fall back to the configured level.
    fn env_filter(default_level: &str) -> Result<EnvFilter, AppError> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .map_err(|e| AppError::Logging(e.to_string()))
    }

    /// Path of today's log file, for display in the help overlay.
    #[must_use]
    pub fn current_log_file(dir: &Path) -> std::path::PathBuf {
        let today = chrono::Local::now().format("%Y-%m-%d");
        dir.join(format!("docflow.log.{today}"))
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically-increasing sequence number
        let seq: usize = SEQ
            .get_or_init(|| AtomicUsize::new(1))
            .fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
