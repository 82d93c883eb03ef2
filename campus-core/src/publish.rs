//! High-level pipeline: package → upload → register for configured documents.
//!
//! [`publish`] runs the packaging routine for every document named in the
//! [`PublishConfig`], uploads each archive as a web package on the configured
//! lesson, then registers a `web_package` content item pointing at it. The
//! pipeline is sequential and fail-fast: the first failing step aborts the
//! run with the offending document named, and steps already completed for
//! earlier documents are not rolled back.
//!
//! Callable from the CLI crate and from integration tests; expects a concrete
//! async [`Publisher`] implementation for the uploads.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};

use crate::config::PublishConfig;
use crate::contract::{Archiver, NewContentItem, NewWebPackage, Publisher, Renderer};
use crate::package::{package, PackageError, PackageOptions};

/// Result of a completed publish run, one entry per document.
#[derive(Debug)]
pub struct PublishReport {
    pub lesson_id: i64,
    pub published: Vec<PublishedDocument>,
}

#[derive(Debug)]
pub struct PublishedDocument {
    pub document: PathBuf,
    pub archive_path: PathBuf,
    pub web_package_id: i64,
    pub content_item_id: i64,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Package(#[from] PackageError),
    #[error("upload failed for {}: {source}", .document.display())]
    Upload {
        document: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub async fn publish<R, A, P>(
    config: &PublishConfig,
    renderer: &R,
    archiver: &A,
    publisher: &P,
) -> Result<PublishReport, PublishError>
where
    R: Renderer + ?Sized,
    A: Archiver + ?Sized,
    P: Publisher + ?Sized,
{
    info!(
        lesson_id = config.lesson_id,
        documents = config.documents.len(),
        "Starting publish run"
    );

    let mut published = Vec::new();
    for document in &config.documents {
        let options = PackageOptions {
            output_dir: config.output_dir.clone(),
            quiet: config.quiet,
            overwrite: config.overwrite,
        };
        let archive_path = package(renderer, archiver, document, &options)?;

        let name = match archive_path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => format!("lesson-{}.zip", config.lesson_id),
        };
        let title = document
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("lesson")
            .to_string();

        let web_package = publisher
            .upload_web_package(NewWebPackage {
                lesson_id: config.lesson_id,
                name: &name,
                archive: &archive_path,
            })
            .await
            .map_err(|source| {
                error!(document = %document.display(), error = %source, "Web package upload failed");
                PublishError::Upload {
                    document: document.clone(),
                    source,
                }
            })?;

        let content_item = publisher
            .create_content_item(NewContentItem {
                lesson_id: config.lesson_id,
                title: &title,
                web_package_id: web_package.web_package_id,
            })
            .await
            .map_err(|source| {
                error!(document = %document.display(), error = %source, "Content item creation failed");
                PublishError::Upload {
                    document: document.clone(),
                    source,
                }
            })?;

        info!(
            document = %document.display(),
            web_package_id = web_package.web_package_id,
            content_item_id = content_item.content_item_id,
            "Published document"
        );
        published.push(PublishedDocument {
            document: document.clone(),
            archive_path,
            web_package_id: web_package.web_package_id,
            content_item_id: content_item.content_item_id,
        });
    }

    Ok(PublishReport {
        lesson_id: config.lesson_id,
        published,
    })
}
