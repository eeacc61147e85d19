use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::CompileError;

pub const CONFIG_FILE: &str = "mjsema.toml";

/// Analysis settings, read from the `[analyzer]` table of `mjsema.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Worker threads used to check class bodies. `1` checks sequentially.
    pub jobs: usize,
    /// Report at most this many diagnostics (after sorting).
    pub max_diagnostics: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { jobs: 1, max_diagnostics: None }
    }
}

#[derive(Deserialize)]
struct TomlConfig {
    #[serde(default)]
    analyzer: AnalyzerConfig,
}

/// `mjsema.toml` in the directory of `source_path`, if there is one.
pub fn find_config(source_path: &Path) -> Option<PathBuf> {
    let dir = source_path.parent().unwrap_or_else(|| Path::new("."));
    let candidate = dir.join(CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

pub fn load_config(path: &Path) -> Result<AnalyzerConfig, CompileError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CompileError::config(format!("{CONFIG_FILE}: could not read file: {e}"), path.to_path_buf())
    })?;
    parse_config(&content, path)
}

pub fn parse_config(content: &str, path: &Path) -> Result<AnalyzerConfig, CompileError> {
    let parsed: TomlConfig = toml::from_str(content).map_err(|e| {
        CompileError::config(format!("{CONFIG_FILE}: invalid syntax: {e}"), path.to_path_buf())
    })?;
    let config = parsed.analyzer;
    if config.jobs == 0 {
        return Err(CompileError::config(
            format!("{CONFIG_FILE}: 'jobs' must be at least 1"),
            path.to_path_buf(),
        ));
    }
    tracing::debug!(jobs = config.jobs, max_diagnostics = ?config.max_diagnostics, "loaded config");
    Ok(config)
}
