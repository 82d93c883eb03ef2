//! # contract: collaborator seams for packaging and publishing
//!
//! This module defines the traits the packaging routine and the publish
//! pipeline are written against, plus the plain data types exchanged across
//! them:
//!
//! - [`Renderer`]: turns a source document into an HTML entry point inside a
//!   staging directory (production: the `quarto` CLI).
//! - [`Archiver`]: compresses staging directories into an archive, reporting
//!   the external tool's exit status (production: the `zip` CLI).
//! - [`Publisher`]: uploads finished archives as web packages and registers
//!   content items for them (production: the Campus API client in the
//!   application crate).
//!
//! ## Mocking & Testing
//! - All traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests. Mocks are exported under
//!   the `test-export-mocks` feature.
//!
//! ## Adding New Implementations
//! - Implement the trait for your renderer/archiver/upload destination.
//! - Convert all meaningful upstream errors into the trait's error type; the
//!   packaging routine decides what is fatal and what is cleaned up.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Failure of the external render step.
///
/// The packaging routine propagates these unchanged, so the message a caller
/// sees is the renderer's own.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch renderer: {0}")]
    Launch(#[from] io::Error),
    #[error("render exited with status {status} for {}", .document.display())]
    Failed { status: i32, document: PathBuf },
}

/// Renders one source document into a staging directory.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
pub trait Renderer: Send + Sync {
    /// Render `document`, placing a file named `entry_point` under
    /// `output_dir`. The directory may be partially created even on failure;
    /// the caller owns cleanup.
    fn render(
        &self,
        document: &Path,
        entry_point: &str,
        output_dir: &Path,
        quiet: bool,
    ) -> Result<(), RenderError>;
}

/// Compresses directories into an archive by invoking an external tool.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
pub trait Archiver: Send + Sync {
    /// Create `archive_name` containing `members`, both resolved against the
    /// process working directory, and return the tool's exit status. An `Err`
    /// means the tool could not be launched at all.
    fn archive(&self, archive_name: &str, members: &[String], quiet: bool) -> io::Result<i32>;
}

/// Minimal data needed to upload a packaged archive as a web package.
pub struct NewWebPackage<'a> {
    /// The lesson the web package belongs to.
    pub lesson_id: i64,
    /// Display name, typically the archive file name.
    pub name: &'a str,
    /// Path to the zip archive produced by the packaging routine.
    pub archive: &'a Path,
}

/// The created/returned web package.
#[derive(Debug, Clone)]
pub struct WebPackage {
    pub web_package_id: i64,
    pub lesson_id: i64,
    pub name: String,
    pub checksum: String,
    pub updated_datetime: Option<String>,
}

/// Minimal data needed to register a content item for a web package.
pub struct NewContentItem<'a> {
    pub lesson_id: i64,
    pub title: &'a str,
    pub web_package_id: i64,
}

/// The created/returned content item.
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub content_item_id: i64,
    pub lesson_id: i64,
    pub title: String,
    pub kind: String,
    pub web_package_id: Option<i64>,
    pub updated_datetime: Option<String>,
}

/// Error type for the [`Publisher`] trait (boxed, like the transport errors
/// it wraps).
pub type PublishApiError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for uploading packaged lessons to a backing platform.
/// The implementor is responsible for connecting to the remote API.
///
/// The trait is implemented by real clients and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload a packaged archive as a new web package for a lesson.
    async fn upload_web_package<'a>(
        &self,
        req: NewWebPackage<'a>,
    ) -> Result<WebPackage, PublishApiError>;

    /// Register a content item pointing at an uploaded web package.
    async fn create_content_item<'a>(
        &self,
        req: NewContentItem<'a>,
    ) -> Result<ContentItem, PublishApiError>;
}
