// src/logging/mod.rs
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use chrono::Utc;
use log::LevelFilter;
use thiserror::Error;

use crate::core::config::Config;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),

    #[error("Log rotation error: {0}")]
    RotationError(String),
}

pub type Result<T> = std::result::Result<T, LoggingError>;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

/// Append-only log file with size based rotation.
///
/// The active file keeps its configured name; rotated files get a
/// `-YYYYmmddHHMMSS` suffix next to it.
pub struct LogFile {
    log_dir: PathBuf,
    current_log_file: PathBuf,
    max_log_size: u64,        // Maximum size of a log file before rotation (in bytes)
    max_log_files: usize,     // Maximum number of rotated files to keep
}

impl LogFile {
    pub fn new(path: &Path) -> Result<Self> {
        let log_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)?;
        }

        Ok(Self {
            log_dir,
            current_log_file: path.to_path_buf(),
            max_log_size: MAX_LOG_SIZE,
            max_log_files: MAX_LOG_FILES,
        })
    }

    pub fn with_limits(mut self, max_log_size: u64, max_log_files: usize) -> Self {
        self.max_log_size = max_log_size;
        self.max_log_files = max_log_files.max(1);
        self
    }

    // Open the active file for appending, rotating first if it grew too large
    pub fn open(&self) -> Result<File> {
        self.check_rotation()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.current_log_file)?;

        Ok(file)
    }

    fn check_rotation(&self) -> Result<()> {
        let size = match fs::metadata(&self.current_log_file) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if size > self.max_log_size {
            self.rotate_logs()?;
        }

        Ok(())
    }

    fn rotate_logs(&self) -> Result<()> {
        let stem = self.current_log_file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LoggingError::RotationError(format!(
                "log file name is not valid UTF-8: {}",
                self.current_log_file.display()
            )))?;

        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let rotated_log_file = self.log_dir.join(format!("{}-{}.log", stem, timestamp));

        fs::rename(&self.current_log_file, &rotated_log_file)?;

        self.cleanup_old_logs(stem)
    }

    // Keep only the most recent rotated files
    fn cleanup_old_logs(&self, stem: &str) -> Result<()> {
        let prefix = format!("{}-", stem);
        let mut log_files = Vec::new();

        for entry in fs::read_dir(&self.log_dir)? {
            let path = entry?.path();

            let is_rotated = path.is_file()
                && path.extension().map_or(false, |ext| ext == "log")
                && path.file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(&prefix));

            if is_rotated && path != self.current_log_file {
                log_files.push(path);
            }
        }

        // Names embed the rotation timestamp, so they sort newest-last
        log_files.sort();
        log_files.reverse();

        for file in log_files.iter().skip(self.max_log_files) {
            fs::remove_file(file)?;
        }

        Ok(())
    }
}

/// Route the `log` facade into the configured log file.
///
/// Console output is reserved for the terminal UI.
pub fn init(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug.max(config.log_level)
    } else {
        config.log_level
    };

    let file = LogFile::new(&config.log_file)?
        .with_limits(MAX_LOG_SIZE, MAX_LOG_FILES)
        .open()?;

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}
