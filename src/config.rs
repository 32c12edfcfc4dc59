//! Configuration for the episode catalog.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CATALOG_HOME, CATALOG_CONTENT)
//! 2. Config file (.catalog/config.yaml)
//! 3. Defaults (~/.episode-catalog)
//!
//! Config file discovery:
//! - Searches current directory and parents for .catalog/config.yaml
//! - Paths in config file are relative to the config file's project root
//!   (the directory holding `.catalog/`)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::TemplateHost;
use crate::core::IntegrityOptions;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Directory holding the config file
pub const CONFIG_DIR: &str = ".catalog";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub hosting: Option<TemplateHost>,
    #[serde(default)]
    pub integrity: Option<IntegrityOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Catalog home directory (relative to project root)
    pub home: Option<String>,
    /// Content directory (relative to project root)
    pub content: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Catalog home directory
    pub home: PathBuf,
    /// Content root (episodes/, collections/, references.yaml)
    pub content: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Video hosting convention
    pub hosting: TemplateHost,
    /// Integrity check settings
    pub integrity: IntegrityOptions,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let current = std::env::current_dir().ok()?;
    find_config_file_from(&current)
}

fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Environment overrides, read once per resolution
struct EnvOverrides {
    home: Option<PathBuf>,
    content: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("CATALOG_HOME").ok().map(PathBuf::from),
            content: std::env::var("CATALOG_CONTENT").ok().map(PathBuf::from),
        }
    }
}

/// Merge a config file (if any) with env overrides and defaults
fn resolve(
    default_home: PathBuf,
    config_file: Option<PathBuf>,
    env: EnvOverrides,
) -> Result<ResolvedConfig> {
    let Some(config_path) = config_file else {
        let home = env.home.unwrap_or(default_home);
        let content = env.content.unwrap_or_else(|| home.join("content"));

        return Ok(ResolvedConfig {
            home,
            content,
            config_file: None,
            hosting: TemplateHost::default(),
            integrity: IntegrityOptions::default(),
        });
    };

    let config = load_config_file(&config_path)?;

    // Base directory is the parent of .catalog/ (i.e., grandparent of config.yaml)
    let base_dir = config_path
        .parent()
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));

    let home = if let Some(home) = env.home {
        home
    } else if let Some(ref home_path) = config.paths.home {
        resolve_path(base_dir, home_path)
    } else {
        default_home
    };

    let content = if let Some(content) = env.content {
        content
    } else if let Some(ref content_path) = config.paths.content {
        resolve_path(base_dir, content_path)
    } else {
        home.join("content")
    };

    Ok(ResolvedConfig {
        home,
        content,
        hosting: config.hosting.unwrap_or_default(),
        integrity: config.integrity.unwrap_or_default(),
        config_file: Some(config_path),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".episode-catalog");

    resolve(default_home, find_config_file(), EnvOverrides::from_env())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration, bypassing the cache
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the content directory.
pub fn content_dir() -> Result<PathBuf> {
    Ok(config()?.content.clone())
}
