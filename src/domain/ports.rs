use crate::utils::error::Result;
use chrono::{DateTime, FixedOffset};

/// Where printed text ends up.
pub trait Output: Send + Sync {
    /// Write already rendered text to the screen stream and flush it.
    fn write_screen(&self, text: &str) -> Result<()>;

    /// Append text to the file at `path`, creating it when needed.
    fn append_file(&self, path: &str, text: &str) -> Result<()>;
}

pub trait Clock: Send + Sync {
    /// Current local time together with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Lookup of translated lines by message key.
pub trait Catalog: Send + Sync {
    /// Return the line for `key` in `language`, or `None` to keep the key as is.
    /// `main` is the language to fall back to.
    fn lookup(&self, key: &str, language: &str, main: &str) -> Option<String>;
}

impl<T: Output + ?Sized> Output for std::sync::Arc<T> {
    fn write_screen(&self, text: &str) -> Result<()> {
        (**self).write_screen(text)
    }

    fn append_file(&self, path: &str, text: &str) -> Result<()> {
        (**self).append_file(path, text)
    }
}

impl<T: Output + ?Sized> Output for Box<T> {
    fn write_screen(&self, text: &str) -> Result<()> {
        (**self).write_screen(text)
    }

    fn append_file(&self, path: &str, text: &str) -> Result<()> {
        (**self).append_file(path, text)
    }
}
