//! # package: render-and-zip packaging of one Quarto document
//!
//! [`package`] turns a single `.qmd` document into a zip archive suitable for
//! upload as a web package: it renders the document into a staging directory
//! named `_<stem>` next to the archive, compresses that directory with the
//! archive members stored relative, and cleans up the staging directory
//! depending on how far the run got.
//!
//! The routine is synchronous and blocking throughout. It briefly changes the
//! process working directory while the archive step runs, and restores it on
//! every exit path; concurrent invocations targeting the same output
//! directory and document stem are unsupported (last writer wins on the
//! staging directory and the archive path).

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::contract::{Archiver, RenderError, Renderer};

/// Recognized source document extension.
pub const DOCUMENT_EXTENSION: &str = "qmd";

/// Canonical name of the rendered entry point inside the staging directory.
pub const ENTRY_POINT_NAME: &str = "index.html";

/// Caller-facing options for [`package`].
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Directory for the staging directory and the archive. Defaults to the
    /// document's own directory. Created (with parents) if absent.
    pub output_dir: Option<PathBuf>,
    /// Suppress progress output of the render and archive tools.
    pub quiet: bool,
    /// Replace an existing archive at the computed path.
    pub overwrite: bool,
}

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("not a .qmd document: {}", .path.display())]
    NotADocument { path: PathBuf },
    #[error("document does not exist: {}", .path.display())]
    DocumentMissing { path: PathBuf },
    #[error("archive already exists: {} (enable overwrite to replace it)", .path.display())]
    ArchiveExists { path: PathBuf },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("archive step exited with status {status} while writing {}", .path.display())]
    Archive { status: i32, path: PathBuf },
    #[error("package IO error: {0}")]
    Io(#[from] io::Error),
}

/// How far a packaging run got. Drives the single cleanup block at the end
/// of [`package`].
enum Outcome {
    NotStarted,
    Rendered,
    Archived,
}

/// Restores the previous working directory on drop.
struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    fn change_to(dir: &Path) -> io::Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(CwdGuard { previous })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(
                error = ?e,
                path = %self.previous.display(),
                "Failed to restore working directory"
            );
        }
    }
}

/// Package one document: render it into `_<stem>/index.html` under the
/// output directory, compress that staging directory into `<stem>.zip` and
/// return the absolute archive path.
///
/// The staging directory survives only a render-succeeded/archive-failed run
/// (left in place for debugging); it is removed in every other terminal
/// state. The previous working directory is restored on every exit path.
pub fn package<R, A>(
    renderer: &R,
    archiver: &A,
    document: &Path,
    options: &PackageOptions,
) -> Result<PathBuf, PackageError>
where
    R: Renderer + ?Sized,
    A: Archiver + ?Sized,
{
    if document.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
        return Err(PackageError::NotADocument {
            path: document.to_path_buf(),
        });
    }
    if !document.is_file() {
        return Err(PackageError::DocumentMissing {
            path: document.to_path_buf(),
        });
    }
    let document = fs::canonicalize(document)?;

    let output_dir = match &options.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            fs::canonicalize(dir)?
        }
        None => document
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "document has no parent directory"))?,
    };

    let base_name = document
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "document name is not valid UTF-8"))?
        .to_string();
    let staging_name = format!("_{base_name}");
    let archive_name = format!("{base_name}.zip");
    let staging_dir = output_dir.join(&staging_name);
    let archive_path = output_dir.join(&archive_name);

    if archive_path.exists() {
        if !options.overwrite {
            return Err(PackageError::ArchiveExists { path: archive_path });
        }
        // zip updates an existing archive in place, which would keep stale
        // entries around.
        fs::remove_file(&archive_path)?;
    }

    info!(
        document = %document.display(),
        archive = %archive_path.display(),
        "Packaging document"
    );

    let mut outcome = Outcome::NotStarted;
    let result = (|| -> Result<(), PackageError> {
        renderer.render(&document, ENTRY_POINT_NAME, &staging_dir, options.quiet)?;
        outcome = Outcome::Rendered;
        debug!(staging = %staging_dir.display(), "Render step complete");

        // Archive members must be stored relative, so the tool runs with the
        // output directory as its working directory.
        let _cwd = CwdGuard::change_to(&output_dir)?;
        let status = archiver.archive(&archive_name, &[staging_name.clone()], options.quiet)?;
        if status != 0 {
            return Err(PackageError::Archive {
                status,
                path: archive_path.clone(),
            });
        }
        outcome = Outcome::Archived;
        Ok(())
    })();

    match outcome {
        Outcome::Rendered => {
            warn!(
                staging = %staging_dir.display(),
                "Archive step failed, keeping staging directory for inspection"
            );
        }
        Outcome::NotStarted | Outcome::Archived => remove_staging(&staging_dir),
    }

    result?;
    info!(archive = %archive_path.display(), "Package created");
    Ok(archive_path)
}

fn remove_staging(staging_dir: &Path) {
    match fs::remove_dir_all(staging_dir) {
        Ok(()) => debug!(staging = %staging_dir.display(), "Removed staging directory"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            error = ?e,
            staging = %staging_dir.display(),
            "Failed to remove staging directory"
        ),
    }
}
