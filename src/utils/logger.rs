//! Logging setup.
//!
//! Console output at the configured level, plus one DEBUG file per day under
//! `log_dir` named `YYYY-MM-DD.log`. The file rolls over at local midnight.

use crate::error::AgentError;
use crate::models::config::LoggingConfig;
use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), AgentError> {
    let level = parse_level(&config.level)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(level)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(level)
            .boxed()
    };
    layers.push(console);

    let mut log_file = None;
    if let Some(dir) = &config.log_dir {
        let today = Local::now().date_naive();
        let path = log_file_path(Path::new(dir), today);
        let writer = DailyLogWriter::open(Path::new(dir), today)?;

        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(writer))
                .with_filter(LevelFilter::DEBUG)
                .boxed(),
        );
        log_file = Some((PathBuf::from(dir), today, path));
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| AgentError::Config(format!("failed to install logger: {}", e)))?;

    if let Some((dir, today, path)) = log_file {
        tracing::info!(path = %path.display(), "logging to file");
        match prune_old_logs(&dir, today, config.retention_days) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "old log files removed"),
            Err(e) => tracing::warn!(error = %e, "failed to prune old log files"),
        }
    }

    Ok(())
}

pub fn parse_level(level: &str) -> Result<LevelFilter, AgentError> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| AgentError::Config(format!("invalid log level '{}'", level)))
}

/// `<dir>/<YYYY-MM-DD>.log`
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Appends to the log file of the current local date, switching files when
/// the date changes
pub struct DailyLogWriter {
    dir: PathBuf,
    current: Mutex<(NaiveDate, File)>,
}

impl DailyLogWriter {
    pub fn open(dir: &Path, today: NaiveDate) -> Result<Self, AgentError> {
        let file = open_log_file(&log_file_path(dir, today))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            current: Mutex::new((today, file)),
        })
    }

    fn write_dated(&self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut current = self.current.lock();
        if current.0 != date {
            let file = open_log_file(&log_file_path(&self.dir, date))?;
            *current = (date, file);
        }
        current.1.write(buf)
    }
}

impl Write for &DailyLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_dated(Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.current.lock().1.flush()
    }
}

/// Delete daily log files older than `retention_days` before `today`.
/// Files not named like a daily log are left alone.
pub fn prune_old_logs(dir: &Path, today: NaiveDate, retention_days: u32) -> Result<usize, AgentError> {
    if retention_days == 0 || !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(date) = log_file_date(&path) else {
            continue;
        };
        if (today - date).num_days() > i64::from(retention_days) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}

fn log_file_date(path: &Path) -> Option<NaiveDate> {
    if path.extension()? != "log" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
