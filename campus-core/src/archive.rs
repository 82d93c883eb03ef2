//! Production [`Archiver`] backed by the `zip` CLI.

use std::io;
use std::process::Command;

use tracing::{error, info};

use crate::contract::Archiver;

/// Compresses directories with `zip -r`, run from the caller's working
/// directory so member paths are stored relative.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        ZipArchiver
    }
}

impl Archiver for ZipArchiver {
    fn archive(&self, archive_name: &str, members: &[String], quiet: bool) -> io::Result<i32> {
        let mut command = Command::new("zip");
        command.arg("-r");
        if quiet {
            command.arg("-q");
        }
        command.arg(archive_name);
        command.args(members);

        info!(archive = archive_name, members = ?members, "Compressing with zip");
        let status = command.status().map_err(|e| {
            error!(error = ?e, archive = archive_name, "Failed to launch zip");
            e
        })?;
        // The caller interprets the status; non-zero is not an Err here.
        Ok(status.code().unwrap_or(-1))
    }
}
