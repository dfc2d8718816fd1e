//! # Share-Capture Inbox
//!
//! URLs captured by the share extension land in `pending_urls.json`, a JSON
//! array of strings in a directory both processes can reach. The sync
//! service turns each URL into an add-by-URL intent and then acknowledges
//! it, which removes it from the file.
//!
//! Writes go to a temporary file that is renamed over the inbox, so a
//! reader never sees a half-written array.

use crate::client::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// File name of the inbox inside the shared directory
pub const INBOX_FILE_NAME: &str = "pending_urls.json";

const URL_PATTERN_SRC: &str = r"https?://[^\s]+";

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(URL_PATTERN_SRC).expect("URL pattern is a valid literal regex"));

/// Every `http(s)://` run of non-whitespace in `text`, in order
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// JSON-file inbox shared with the capture process
#[derive(Debug, Clone)]
pub struct ShareInbox {
    path: PathBuf,
}

impl ShareInbox {
    /// Inbox file inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(INBOX_FILE_NAME),
        }
    }

    /// Inbox in the platform data directory
    pub fn default_location() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("notebrain");
        Self::in_dir(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URLs waiting to be ingested; a missing file is an empty inbox
    pub fn pending(&self) -> Result<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Add URLs that are not already waiting; returns how many were new
    pub fn push(&self, urls: &[String]) -> Result<usize> {
        let mut pending = self.pending()?;
        let before = pending.len();
        for url in urls {
            if !pending.contains(url) {
                pending.push(url.clone());
            }
        }
        let added = pending.len() - before;
        if added > 0 {
            self.write(&pending)?;
            tracing::info!("[INBOX] Saved {} URL(s), {} pending", added, pending.len());
        }
        Ok(added)
    }

    /// Extract URLs from shared text and push them
    pub fn push_text(&self, text: &str) -> Result<usize> {
        self.push(&extract_urls(text))
    }

    /// Remove handled URLs, keeping anything pushed since they were read
    pub fn acknowledge(&self, handled: &[String]) -> Result<()> {
        let remaining: Vec<String> = self
            .pending()?
            .into_iter()
            .filter(|url| !handled.contains(url))
            .collect();
        if remaining.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        } else {
            self.write(&remaining)
        }
    }

    /// Take every pending URL and empty the inbox
    pub fn drain(&self) -> Result<Vec<String>> {
        let urls = self.pending()?;
        if !urls.is_empty() {
            self.acknowledge(&urls)?;
        }
        Ok(urls)
    }

    fn write(&self, urls: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(urls)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
