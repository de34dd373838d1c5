mod file_config;

pub use file_config::FileConfig;

use crate::artifacts::ArtifactPaths;
use crate::catalog::{DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_TOKEN_URL};
use crate::recommender::DEFAULT_OVERFETCH_FACTOR;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub artifacts_dir: Option<PathBuf>,
    pub port: u16,
    pub enrichment_concurrency: usize,
    pub overfetch_factor: usize,
    pub token_url: Option<String>,
    pub api_base: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: None,
            port: 3001,
            enrichment_concurrency: DEFAULT_CONCURRENCY,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            token_url: None,
            api_base: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifacts_dir: PathBuf,
    pub port: u16,
    pub enrichment_concurrency: usize,
    pub overfetch_factor: usize,
    pub token_url: String,
    pub api_base: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let artifacts_dir = file
            .artifacts_dir
            .map(PathBuf::from)
            .or_else(|| cli.artifacts_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "artifacts_dir must be specified via --artifacts-dir or in config file"
                )
            })?;

        if !artifacts_dir.exists() {
            bail!("Artifacts directory does not exist: {:?}", artifacts_dir);
        }
        if !artifacts_dir.is_dir() {
            bail!("artifacts_dir is not a directory: {:?}", artifacts_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let enrichment_concurrency = file
            .enrichment_concurrency
            .unwrap_or(cli.enrichment_concurrency);
        if enrichment_concurrency == 0 {
            bail!("enrichment_concurrency must be at least 1");
        }

        let overfetch_factor = file.overfetch_factor.unwrap_or(cli.overfetch_factor);
        if overfetch_factor < 2 {
            bail!("overfetch_factor must be at least 2");
        }

        let token_url = file
            .token_url
            .or_else(|| cli.token_url.clone())
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string());
        let api_base = file
            .api_base
            .or_else(|| cli.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            artifacts_dir,
            port,
            enrichment_concurrency,
            overfetch_factor,
            token_url,
            api_base,
        })
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::from_dir(&self.artifacts_dir)
    }
}
