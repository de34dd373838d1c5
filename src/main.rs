use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackmatch::artifacts::ArtifactStore;
use trackmatch::catalog::{
    HttpTokenTransport, MetadataFetcher, SpotifyClient, TokenCache, DEFAULT_CONCURRENCY,
};
use trackmatch::config::{AppConfig, CliConfig, FileConfig};
use trackmatch::recommender::{RecommendationEngine, DEFAULT_OVERFETCH_FACTOR};
use trackmatch::server::{run_server, ServerState};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the trained artifacts (model.json, scaler.json,
    /// features.json, dataset.json).
    #[clap(long, value_parser = parse_path)]
    pub artifacts_dir: Option<PathBuf>,

    /// Optional TOML config file; its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// Maximum number of concurrent catalog lookups during enrichment.
    #[clap(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub enrichment_concurrency: usize,

    /// Neighbors fetched per requested result, as headroom for filtering.
    #[clap(long, default_value_t = DEFAULT_OVERFETCH_FACTOR)]
    pub overfetch_factor: usize,

    /// Override the catalog authorization endpoint.
    #[clap(long)]
    pub token_url: Option<String>,

    /// Override the catalog API base URL.
    #[clap(long)]
    pub api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;

    let cli_config = CliConfig {
        artifacts_dir: cli_args.artifacts_dir,
        port: cli_args.port,
        enrichment_concurrency: cli_args.enrichment_concurrency,
        overfetch_factor: cli_args.overfetch_factor,
        token_url: cli_args.token_url,
        api_base: cli_args.api_base,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let client_id =
        std::env::var("CLIENT_ID").context("CLIENT_ID must be set in the environment")?;
    let client_secret =
        std::env::var("CLIENT_SECRET").context("CLIENT_SECRET must be set in the environment")?;

    info!("Loading artifacts from {:?}...", config.artifacts_dir);
    let store = ArtifactStore::new(config.artifact_paths());
    let artifacts = store.load()?;
    if artifacts.dataset.is_empty() {
        tracing::warn!("Reference dataset is empty, recommendations will be unavailable");
    }

    let engine = Arc::new(RecommendationEngine::new(
        artifacts.clone(),
        config.overfetch_factor,
    ));

    let transport = Arc::new(HttpTokenTransport::new(
        &config.token_url,
        &client_id,
        &client_secret,
    )?);
    let tokens = Arc::new(TokenCache::new(transport));
    let catalog = Arc::new(SpotifyClient::new(&config.api_base, tokens)?);
    let fetcher = Arc::new(MetadataFetcher::new(
        catalog,
        config.enrichment_concurrency,
    ));

    let state = ServerState::new(artifacts, engine, fetcher);
    run_server(state, config.port).await
}
