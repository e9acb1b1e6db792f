//! File-backed token store
//!
//! A JSON object of string keys to string values, the same shape as browser
//! `localStorage`. Every call reads or rewrites the whole file. Writes go to
//! a sibling temp file that is renamed over the original.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};
use crate::session::TokenStore;

/// Token store persisted to a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_content(&self) -> ClientResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(Some(content).filter(|c| !c.trim().is_empty()))
    }

    fn parse(&self, content: &str) -> ClientResult<BTreeMap<String, String>> {
        serde_json::from_str(content)
            .map_err(|e| ClientError::Storage(format!("{:?} is corrupt: {}", self.path, e)))
    }

    fn read_entries(&self) -> ClientResult<BTreeMap<String, String>> {
        match self.read_content()? {
            Some(content) => self.parse(&content),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Entries to start a write from, and whether a corrupt file was discarded
    fn entries_for_write(&self) -> ClientResult<(BTreeMap<String, String>, bool)> {
        let Some(content) = self.read_content()? else {
            return Ok((BTreeMap::new(), false));
        };

        match self.parse(&content) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                tracing::warn!("Discarding unreadable token store: {}", e);
                Ok((BTreeMap::new(), true))
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            self.io_error(e)
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "storage.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, err: std::io::Error) -> ClientError {
        ClientError::Storage(format!("{:?}: {}", self.path, err))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let (mut entries, _) = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let (mut entries, discarded) = self.entries_for_write()?;
        if entries.remove(key).is_some() || discarded {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
