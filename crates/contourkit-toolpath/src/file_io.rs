//! File I/O
//!
//! Line-oriented reading of profile and sketch files, and all-or-nothing
//! writing of results. Output goes to a sibling temporary file that is
//! renamed over the target once every line has been written, so a failed
//! run never leaves a partial toolpath behind.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

/// Buffer size for reading input files (64 KB)
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Files above this size trigger a warning, since they are read whole
const LARGE_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// File read statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadStats {
    /// Total lines read
    pub lines_read: u64,
    /// File size in bytes
    pub file_size: u64,
    /// Time taken to read (milliseconds)
    pub read_time_ms: u64,
}

/// Line reader for text input files
pub struct LineFileReader {
    path: PathBuf,
    file_size: u64,
}

impl LineFileReader {
    /// Create a reader for `path`
    ///
    /// # Errors
    /// Returns error if the file does not exist or is not a regular file
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(anyhow!("File does not exist: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow!("Path is not a file: {}", path.display()));
        }

        let file_size = fs::metadata(&path)?.len();

        Ok(Self { path, file_size })
    }

    /// Get file size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every line into memory, line terminators stripped
    pub fn read_lines(&self) -> Result<(Vec<String>, FileReadStats)> {
        if self.file_size > LARGE_FILE_BYTES {
            warn!(
                "Reading very large file ({}MB) into memory",
                self.file_size / (1024 * 1024)
            );
        }

        let start = Instant::now();
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let stats = FileReadStats {
            lines_read: lines.len() as u64,
            file_size: self.file_size,
            read_time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            path = %self.path.display(),
            lines = stats.lines_read,
            bytes = stats.file_size,
            "File read"
        );

        Ok((lines, stats))
    }
}

/// Read all lines of `path`
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    LineFileReader::new(path)?.read_lines().map(|(lines, _)| lines)
}

/// Write `lines` to `path`, newline-terminated, replacing it atomically
pub fn write_lines<I, S>(path: impl AsRef<Path>, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let staging = staging_path(path)?;

    let result = (|| -> Result<()> {
        let file = File::create(&staging)
            .with_context(|| format!("Failed to create {}", staging.display()))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writer.write_all(line.as_ref().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&staging);
        return Err(e.context(format!("Failed to write {}", path.display())));
    }

    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;
    debug!(path = %path.display(), "File written");
    Ok(())
}

/// Hidden sibling of `path` used while writing
fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Output path has no file name: {}", path.display()))?;
    let mut staging = name.to_os_string();
    staging.push(".partial");
    let mut hidden = std::ffi::OsString::from(".");
    hidden.push(staging);
    Ok(path.with_file_name(hidden))
}
