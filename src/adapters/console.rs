use crate::domain::ports::Output;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
}

/// Writes to the process's standard streams and appends to files on disk.
#[derive(Debug, Clone, Default)]
pub struct ConsoleOutput {
    stream: Stream,
    base_path: Option<PathBuf>,
}

impl ConsoleOutput {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            base_path: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Stream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(Stream::Stderr)
    }

    /// Resolve relative log file paths against `base_path`.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(path),
            None => Path::new(path).to_path_buf(),
        }
    }
}

impl Output for ConsoleOutput {
    fn write_screen(&self, text: &str) -> Result<()> {
        // 整段文字在同一個鎖內寫出，避免多執行緒交錯
        match self.stream {
            Stream::Stdout => {
                let mut handle = std::io::stdout().lock();
                handle.write_all(text.as_bytes())?;
                handle.flush()?;
            }
            Stream::Stderr => {
                let mut handle = std::io::stderr().lock();
                handle.write_all(text.as_bytes())?;
                handle.flush()?;
            }
        }
        Ok(())
    }

    fn append_file(&self, path: &str, text: &str) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full_path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        tracing::debug!("Appended {} bytes to {}", text.len(), full_path.display());
        Ok(())
    }
}
