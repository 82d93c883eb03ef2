//! Installs the static GitHub Actions publish workflow into a project.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

const WORKFLOW_FILE_NAME: &str = "publish-lessons.yml";
const WORKFLOW_TEMPLATE: &str = include_str!("../templates/publish-lessons.yml");

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("workflow already exists: {} (use force to replace it)", .path.display())]
    WorkflowExists { path: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Copy the embedded workflow definition to
/// `<project_dir>/.github/workflows/publish-lessons.yml`, creating parent
/// directories as needed. Refuses to replace an existing file unless `force`.
pub fn install_workflow(project_dir: &Path, force: bool) -> Result<PathBuf, ScaffoldError> {
    let workflows_dir = project_dir.join(".github").join("workflows");
    let target = workflows_dir.join(WORKFLOW_FILE_NAME);

    if target.exists() && !force {
        return Err(ScaffoldError::WorkflowExists { path: target });
    }

    fs::create_dir_all(&workflows_dir)?;
    fs::write(&target, WORKFLOW_TEMPLATE)?;
    info!(path = %target.display(), "Installed publish workflow");
    Ok(target)
}
