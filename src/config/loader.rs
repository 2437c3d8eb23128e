use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "wonderffuf.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub results: Option<String>,
    pub log: Option<String>,
    pub report: Option<String>,
}

/// Values that seed a fresh session. Shared by the top level and by each
/// profile.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionDefaults {
    pub binary: Option<String>,
    pub url: Option<String>,
    pub wordlist: Option<String>,
    pub method: Option<String>,
    pub timeout: Option<u64>,
    #[serde(rename = "extraOptions")]
    pub extra_options: Option<String>,
    pub headers: Option<String>,
    pub cookies: Option<String>,
    pub outputs: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub defaults: SessionDefaults,
    pub profiles: HashMap<String, SessionDefaults>,
    #[serde(rename = "defaultProfile")]
    pub default_profile: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FileConfig,
    pub path: PathBuf,
    pub dir: PathBuf,
}

/// Loads `wonderffuf.json` from `target`, which may be the file itself or
/// the directory holding it. A missing file is not an error.
pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE_NAME), resolved)
    } else {
        let dir = match resolved.parent() {
            Some(parent) => parent.to_path_buf(),
            None => std::env::current_dir()?,
        };
        (resolved.clone(), dir)
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: FileConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}
