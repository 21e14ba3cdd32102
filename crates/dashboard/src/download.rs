//! Delivery of export artifacts.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;
use vitrine_core::ExportArtifact;

/// Destination for finished exports.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Hand the artifact to the user.
    async fn deliver(&self, artifact: &ExportArtifact) -> std::io::Result<()>;
}

/// Writes artifacts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the artifact will be written to.
    #[must_use]
    pub fn path_for(&self, artifact: &ExportArtifact) -> PathBuf {
        self.dir.join(&artifact.filename)
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    #[instrument(skip(self, artifact), fields(filename = %artifact.filename))]
    async fn deliver(&self, artifact: &ExportArtifact) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(artifact);
        tokio::fs::write(&path, &artifact.content).await?;
        tracing::info!(path = %path.display(), bytes = artifact.content.len(), "Export written");
        Ok(())
    }
}
