/// `load_config` module: loads a static YAML publish manifest into the
/// internal [`PublishConfig`].
///
/// This module is the only place where untrusted YAML is parsed and mapped to
/// strongly-typed internal structs. Secrets (the API key) never live in the
/// manifest; they come from the environment via the client configuration.
///
/// # Errors
/// All errors here use `anyhow::Error` for context-rich diagnostics and are
/// surfaced at the CLI boundary.
use anyhow::Result;
use campus_core::config::PublishConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct RawConfig {
    lesson_id: i64,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    overwrite: bool,
    #[serde(default)]
    quiet: bool,
    #[serde(default)]
    documents: Vec<PathBuf>,
}

/// Loads a YAML publish manifest. Returns a processable config for the CLI.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading publish config from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if raw.documents.is_empty() {
        return Err(anyhow::anyhow!(
            "Publish config {:?} lists no documents",
            path_ref
        ));
    }

    Ok(PublishConfig {
        lesson_id: raw.lesson_id,
        output_dir: raw.output_dir,
        overwrite: raw.overwrite,
        quiet: raw.quiet,
        documents: raw.documents,
    })
}
