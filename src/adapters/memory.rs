use crate::domain::ports::Output;
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Captures screen text and file contents in memory.
///
/// Clones share the same buffers, so a clone kept by the caller observes
/// everything written through the printer that owns the other clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    screen: Arc<Mutex<String>>,
    files: Arc<Mutex<BTreeMap<String, String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> String {
        lock(&self.screen).clone()
    }

    pub fn file(&self, path: &str) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        lock(&self.files).keys().cloned().collect()
    }

    /// Take the screen text, leaving the buffer empty.
    pub fn take_screen(&self) -> String {
        std::mem::take(&mut *lock(&self.screen))
    }
}

impl Output for MemoryOutput {
    fn write_screen(&self, text: &str) -> Result<()> {
        lock(&self.screen).push_str(text);
        Ok(())
    }

    fn append_file(&self, path: &str, text: &str) -> Result<()> {
        lock(&self.files)
            .entry(path.to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }
}
