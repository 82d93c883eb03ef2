//! Production [`Renderer`] backed by the `quarto` CLI.

use std::path::Path;
use std::process::Command;

use tracing::{debug, error, info};

use crate::contract::{RenderError, Renderer};

/// Renders documents by shelling out to `quarto render`.
///
/// Quarto must be installed and on the `PATH`; a missing binary surfaces as
/// [`RenderError::Launch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QuartoRenderer;

impl QuartoRenderer {
    pub fn new() -> Self {
        QuartoRenderer
    }
}

impl Renderer for QuartoRenderer {
    fn render(
        &self,
        document: &Path,
        entry_point: &str,
        output_dir: &Path,
        quiet: bool,
    ) -> Result<(), RenderError> {
        let mut command = Command::new("quarto");
        command
            .arg("render")
            .arg(document)
            .arg("--to")
            .arg("html")
            .arg("--output")
            .arg(entry_point)
            .arg("--output-dir")
            .arg(output_dir);
        if quiet {
            command.arg("--quiet");
        }

        info!(
            document = %document.display(),
            output_dir = %output_dir.display(),
            "Rendering document with quarto"
        );
        let status = command.status().map_err(|e| {
            error!(error = ?e, document = %document.display(), "Failed to launch quarto");
            RenderError::Launch(e)
        })?;

        if status.success() {
            debug!(document = %document.display(), "quarto render finished");
            Ok(())
        } else {
            let code = status.code().unwrap_or(-1);
            error!(
                document = %document.display(),
                status = code,
                "quarto render exited with non-zero status"
            );
            Err(RenderError::Failed {
                status: code,
                document: document.to_path_buf(),
            })
        }
    }
}
