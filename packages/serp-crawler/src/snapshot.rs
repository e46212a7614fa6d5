//! Incremental URL snapshots.
//!
//! After each result page the crawl persists the full deduplicated URL list,
//! overwriting the previous snapshot. The write goes through a temp file in
//! the same directory plus a rename, so a crash mid-write leaves either the
//! old snapshot or the new one, never a truncated file.

use std::io;
use std::path::{Path, PathBuf};

/// Writes the newline-joined URL list to a fixed path, atomically.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with the current URL list.
    pub async fn write<S: AsRef<str>>(&self, urls: &[S]) -> io::Result<()> {
        let mut body = urls
            .iter()
            .map(|u| u.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        if !body.is_empty() {
            body.push('\n');
        }

        // Rename is only atomic within a filesystem, so the temp file sits
        // next to the target.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), urls = urls.len(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_one_url_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let writer = SnapshotWriter::new(&path);

        writer
            .write(&["https://a.example", "https://b.example"])
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "https://a.example\nhttps://b.example\n");
    }

    #[tokio::test]
    async fn overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let writer = SnapshotWriter::new(&path);

        writer.write(&["https://a.example"]).await.unwrap();
        writer
            .write(&["https://a.example", "https://b.example", "https://c.example"])
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let writer = SnapshotWriter::new(&path);

        writer.write(&["https://a.example"]).await.unwrap();

        assert!(!path.with_extension("tmp").exists());
    }
}
