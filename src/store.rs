use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Append-only phrase file, one phrase per line.
///
/// The file is read in full on every lookup; a missing file is an empty store.
#[derive(Debug, Clone)]
pub struct PhraseStore {
    path: PathBuf,
}

impl PhraseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a phrase as a single line, creating the file (and its parent
    /// directory) on first write. Each embedded line break becomes a space;
    /// every other character is kept as given.
    pub async fn append(&self, phrase: &str) -> Result<String> {
        let line = single_line(phrase);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
                info!("Created store directory: {}", parent.display());
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open phrase store: {}", self.path.display()))?;

        file.write_all(format!("{}\n", line).as_bytes())
            .await
            .with_context(|| format!("Failed to append to phrase store: {}", self.path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("Failed to append to phrase store: {}", self.path.display()))?;

        debug!("Appended phrase to {}", self.path.display());
        Ok(line)
    }

    /// Read every stored phrase in file order. Invalid UTF-8 is replaced
    /// rather than failing the whole read.
    pub async fn load(&self) -> Result<Vec<String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read phrase store: {}", self.path.display())
                })
            }
        };

        let content = String::from_utf8_lossy(&bytes);
        Ok(content.lines().map(str::to_string).collect())
    }
}

fn single_line(phrase: &str) -> String {
    phrase.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
