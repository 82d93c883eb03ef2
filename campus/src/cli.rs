/// This module implements the CLI interface for campus: command parsing,
/// argument exposure and orchestration. All packaging and pipeline logic
/// lives in the `campus-core` crate; the API client lives in
/// [`crate::client`].
///
/// For programmatic/integration use, call [`run`] with a constructed [`Cli`].
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use campus_core::archive::ZipArchiver;
use campus_core::package::{package, PackageOptions};
use campus_core::publish::publish;
use campus_core::render::QuartoRenderer;

use crate::client::CampusClient;
use crate::load_config::load_config;
use crate::scaffold::install_workflow;

/// CLI for campus: package Quarto lessons and publish them to the platform.
#[derive(Parser)]
#[clap(
    name = "campus",
    version,
    about = "Package Quarto lessons and publish them to the Campus learning platform"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a document and compress the output into a web package archive
    Package {
        /// Path to the .qmd document
        document: PathBuf,
        /// Directory for the archive (defaults to the document's directory)
        #[clap(long)]
        output_dir: Option<PathBuf>,
        /// Suppress render and archive progress output
        #[clap(long)]
        quiet: bool,
        /// Replace an existing archive at the target path
        #[clap(long)]
        overwrite: bool,
    },
    /// Package and upload all documents from a publish config file
    Publish {
        /// Path to the YAML publish config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Install the GitHub Actions publish workflow into a project
    InitCi {
        /// Target project directory
        #[clap(long, default_value = ".")]
        dir: PathBuf,
        /// Replace an existing workflow file
        #[clap(long)]
        force: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Package {
            document,
            output_dir,
            quiet,
            overwrite,
        } => {
            let options = PackageOptions {
                output_dir,
                quiet,
                overwrite,
            };
            let archive_path = package(
                &QuartoRenderer::new(),
                &ZipArchiver::new(),
                &document,
                &options,
            )?;
            println!("{}", archive_path.display());
            Ok(())
        }
        Commands::Publish { config } => {
            let config = load_config(config)?;
            config.trace_loaded();
            let client = CampusClient::from_env()?;
            match publish(
                &config,
                &QuartoRenderer::new(),
                &ZipArchiver::new(),
                &client,
            )
            .await
            {
                Ok(report) => {
                    tracing::info!(
                        command = "publish",
                        lesson_id = report.lesson_id,
                        published = report.published.len(),
                        "Publish complete"
                    );
                    for entry in &report.published {
                        println!(
                            "{} -> web package {}",
                            entry.document.display(),
                            entry.web_package_id
                        );
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "publish", error = %e, "Publish failed");
                    Err(e.into())
                }
            }
        }
        Commands::InitCi { dir, force } => {
            let path = install_workflow(&dir, force)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
