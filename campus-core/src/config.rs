use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Configuration for one publish run: which documents to package and which
/// lesson receives the resulting web packages.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Lesson that receives the uploaded web packages.
    pub lesson_id: i64,
    /// Shared output directory for staging directories and archives.
    /// Defaults to each document's own directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Replace archives that already exist at the computed paths.
    #[serde(default)]
    pub overwrite: bool,
    /// Suppress render and archive progress output.
    #[serde(default)]
    pub quiet: bool,
    /// The documents to package and upload, in order.
    #[serde(default)]
    pub documents: Vec<PathBuf>,
}

impl PublishConfig {
    pub fn trace_loaded(&self) {
        info!(
            lesson_id = self.lesson_id,
            documents_count = self.documents.len(),
            "Loaded PublishConfig"
        );
        debug!(?self, "PublishConfig loaded (full debug)");
    }
}
