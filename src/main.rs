//! Notegraph - Main Server
//!
//! Serves the notes API, or runs one analysis over a graph exported as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notegraph::graph::{
    AnalysisReport, AnalysisRequest, AnalysisType, GraphAnalyticsEngine, GraphData,
};
use notegraph::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "notegraph")]
#[command(about = "Research notes as a knowledge graph")]
struct Cli {
    /// Path to the YAML config file (default: ./config.yaml)
    #[arg(long, global = true, env = "NOTEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config.yaml and SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one analysis over a JSON graph file ({"nodes": [...], "edges": [...]})
    Analyze {
        /// Graph file
        #[arg(short, long)]
        input: PathBuf,

        /// degree, betweenness, closeness, communities or path
        #[arg(short, long)]
        analysis: AnalysisType,

        /// Path start node (path analysis only)
        #[arg(long)]
        source: Option<i64>,

        /// Path end node (path analysis only)
        #[arg(long)]
        target: Option<i64>,

        /// Seed for community detection
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum label propagation passes
        #[arg(long)]
        max_iterations: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, so analysis output on stdout stays clean JSON)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notegraph=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            notegraph::start_server(config).await
        }
        Commands::Analyze {
            input,
            analysis,
            source,
            target,
            seed,
            max_iterations,
        } => {
            if let Some(seed) = seed {
                config.analytics.community_seed = Some(seed);
            }
            if let Some(max_iterations) = max_iterations {
                config.analytics.community_max_iterations = max_iterations;
            }
            let request = AnalysisRequest {
                analysis,
                source,
                target,
            };
            run_analyze(config, &input, request)
        }
    }
}

fn run_analyze(config: Config, input: &Path, request: AnalysisRequest) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read graph file {}", input.display()))?;
    let graph: GraphData = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid graph JSON in {}", input.display()))?;

    tracing::info!(
        "Analyzing {} nodes, {} edges ({})",
        graph.nodes.len(),
        graph.edges.len(),
        request.analysis
    );

    let engine = GraphAnalyticsEngine::new(config.analytics);
    let result = engine.run(&graph, &request)?;
    let report = AnalysisReport::new(request.analysis, result, &graph);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
