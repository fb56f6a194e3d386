use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;

/// Key/value persistence for client state, in the shape of browser local storage
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Stores each key as a JSON file in a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read stored {}", key)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create storage directory")?;
        fs::write(self.path(key), value).with_context(|| format!("Failed to write stored {}", key))
    }
}

/// Process-local storage, for tests and headless use
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
