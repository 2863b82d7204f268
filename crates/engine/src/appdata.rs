//! App data directory management for the touch shell
//
// Config and logs live under the platform data dir:
//   <data dir>/configs/touch_shell.toml
//   <data dir>/logs/<timestamp>/touch_shell.log

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "touch_shell.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDataPaths {
    pub appdata_dir: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppDataPaths {
    /// Layout rooted at `appdata_dir`, nothing is created.
    pub fn under(appdata_dir: &Path) -> Self {
        let config_dir = appdata_dir.join("configs");
        Self {
            appdata_dir: appdata_dir.to_path_buf(),
            config_file: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
            logs_dir: appdata_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.logs_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Locate the platform data dir and create the shell's directories in it.
pub fn setup_appdata() -> Result<AppDataPaths> {
    let proj_dirs = ProjectDirs::from("com", "Pulsar", "Touch_Shell")
        .context("Could not determine app data directory")?;
    let paths = AppDataPaths::under(proj_dirs.data_dir());
    paths.create_dirs()?;
    Ok(paths)
}
