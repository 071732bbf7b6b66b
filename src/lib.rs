//! Notegraph
//!
//! Research notes as a knowledge graph:
//! - User-scoped notes and links, with `[[Title]]` references turned into links
//! - Graph analytics over a user's notes: degree, betweenness and closeness
//!   centrality, shortest paths, label propagation communities
//! - HTTP API exposing notes, links, the graph snapshot and analytics

pub mod api;
pub mod graph;
pub mod notes;

use anyhow::Result;
use graph::{AnalyticsConfig, GraphAnalyticsEngine};
use notes::{InMemoryNoteStore, NoteManager};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub analytics: AnalyticsConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Resolved configuration. Priority: env vars > YAML > defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Load from `config.yaml` in the working directory, then env vars.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if file not found)
        let yaml = Self::load_yaml(yaml_path);

        // 2. Build Config with env var overrides
        Ok(Self {
            server_port: env_parse("SERVER_PORT").unwrap_or(yaml.server.port),
            analytics: AnalyticsConfig {
                community_max_iterations: env_parse("COMMUNITY_MAX_ITERATIONS")
                    .unwrap_or(yaml.analytics.community_max_iterations),
                community_seed: env_parse("COMMUNITY_SEED").or(yaml.analytics.community_seed),
            },
        })
    }

    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Parse an env var, ignoring it when unset or malformed.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}

// ============================================================================
// Application state & server
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub note_manager: Arc<NoteManager>,
    pub analytics: Arc<GraphAnalyticsEngine>,
}

impl AppState {
    /// Build the state with an empty in-memory note store.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(InMemoryNoteStore::new());
        Self {
            note_manager: Arc::new(NoteManager::new(store)),
            analytics: Arc::new(GraphAnalyticsEngine::new(config.analytics)),
        }
    }

    /// Router serving this state
    pub fn router(&self) -> axum::Router {
        api::create_router(Arc::new(api::ServerState {
            note_manager: self.note_manager.clone(),
            analytics: self.analytics.clone(),
        }))
    }
}

/// Serve the HTTP API until the process is stopped.
pub async fn start_server(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!(
        community_max_iterations = config.analytics.community_max_iterations,
        community_seed = ?config.analytics.community_seed,
        "Starting notegraph server"
    );

    let app = AppState::new(config).router();

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
