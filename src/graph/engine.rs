//! Analytics engine: single entry point for graph analyses.
//!
//! A caller picks one [`AnalysisType`] per request; the engine dispatches to
//! the matching algorithm and wraps its output in an [`AnalysisResult`].
//!
//! [`GraphAnalyticsEngine::run`] computes on the calling thread. The
//! [`AnalyticsEngine`] trait is the async seam used by the HTTP layer: the
//! real implementation moves the computation onto tokio's blocking pool so
//! that large graphs do not stall the runtime. A started computation runs
//! to completion even if the caller goes away.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::algorithms::{
    betweenness_centrality, closeness_centrality, degree_centrality, detect_communities,
    detect_communities_with_rng, shortest_path,
};
use super::models::{AnalyticsConfig, CentralityResult, Community, GraphData, NodeId, PathResult};

// ============================================================================
// Request / result types
// ============================================================================

/// Analysis selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Degree,
    Betweenness,
    Closeness,
    Communities,
    Path,
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degree => write!(f, "degree"),
            Self::Betweenness => write!(f, "betweenness"),
            Self::Closeness => write!(f, "closeness"),
            Self::Communities => write!(f, "communities"),
            Self::Path => write!(f, "path"),
        }
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "betweenness" => Ok(Self::Betweenness),
            "closeness" => Ok(Self::Closeness),
            "communities" | "community" => Ok(Self::Communities),
            "path" | "shortest_path" => Ok(Self::Path),
            _ => Err(format!("Unknown analysis type: {}", s)),
        }
    }
}

/// One analysis to run. `source` and `target` are only read for `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub analysis: AnalysisType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,
}

impl AnalysisRequest {
    pub fn new(analysis: AnalysisType) -> Self {
        Self {
            analysis,
            source: None,
            target: None,
        }
    }

    pub fn path(source: NodeId, target: NodeId) -> Self {
        Self {
            analysis: AnalysisType::Path,
            source: Some(source),
            target: Some(target),
        }
    }
}

/// Output of a single analysis.
///
/// Serialized untagged: a centrality ranking or a community list is a JSON
/// array, a path is an object, an unreachable target is `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Centrality(Vec<CentralityResult>),
    Communities(Vec<Community>),
    Path(Option<PathResult>),
}

impl AnalysisResult {
    /// Every node id mentioned by the result, ascending.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        match self {
            Self::Centrality(scores) => scores.iter().map(|r| r.node_id).collect(),
            Self::Communities(communities) => communities
                .iter()
                .flat_map(|c| c.members.iter().copied())
                .collect(),
            Self::Path(path) => path
                .iter()
                .flat_map(|p| p.path.iter().copied())
                .collect(),
        }
    }

    /// Title of every node mentioned by the result. Ids absent from `graph`
    /// are skipped.
    pub fn titles(&self, graph: &GraphData) -> BTreeMap<NodeId, String> {
        let by_id: HashMap<NodeId, &str> = graph
            .nodes
            .iter()
            .map(|n| (n.id, n.title.as_str()))
            .collect();
        self.node_ids()
            .into_iter()
            .filter_map(|id| by_id.get(&id).map(|t| (id, t.to_string())))
            .collect()
    }
}

/// An analysis result with the titles of the notes it mentions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analysis: AnalysisType,
    pub result: AnalysisResult,
    pub titles: BTreeMap<NodeId, String>,
}

impl AnalysisReport {
    pub fn new(analysis: AnalysisType, result: AnalysisResult, graph: &GraphData) -> Self {
        let titles = result.titles(graph);
        Self {
            analysis,
            result,
            titles,
        }
    }
}

/// Errors raised when an analysis cannot be run.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Path analysis requires both a source and a target note")]
    MissingPathEndpoint,
    #[error("Analysis task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// Trait
// ============================================================================

/// Analytics engine trait.
///
/// Consumers use `Arc<dyn AnalyticsEngine>` for dependency injection.
/// A mock implementation (`MockAnalyticsEngine`) returns pre-configured results.
#[async_trait]
pub trait AnalyticsEngine: Send + Sync {
    /// Run one analysis over a graph snapshot.
    async fn analyze(
        &self,
        graph: GraphData,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalyticsError>;
}

// ============================================================================
// Concrete implementation
// ============================================================================

/// Analytics engine running the in-process algorithms.
#[derive(Debug, Clone, Default)]
pub struct GraphAnalyticsEngine {
    config: AnalyticsConfig,
}

impl GraphAnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run one analysis synchronously on the current thread.
    pub fn run(
        &self,
        graph: &GraphData,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalyticsError> {
        let start = Instant::now();
        let nodes = &graph.nodes;
        let edges = &graph.edges;

        let result = match request.analysis {
            AnalysisType::Degree => AnalysisResult::Centrality(degree_centrality(nodes, edges)),
            AnalysisType::Betweenness => {
                AnalysisResult::Centrality(betweenness_centrality(nodes, edges))
            }
            AnalysisType::Closeness => {
                AnalysisResult::Centrality(closeness_centrality(nodes, edges))
            }
            AnalysisType::Communities => {
                let max_iterations = self.config.community_max_iterations;
                let communities = match self.config.community_seed {
                    Some(seed) => {
                        let mut rng = StdRng::seed_from_u64(seed);
                        detect_communities_with_rng(nodes, edges, max_iterations, &mut rng)
                    }
                    None => detect_communities(nodes, edges, max_iterations),
                };
                AnalysisResult::Communities(communities)
            }
            AnalysisType::Path => {
                let (Some(source), Some(target)) = (request.source, request.target) else {
                    return Err(AnalyticsError::MissingPathEndpoint);
                };
                AnalysisResult::Path(shortest_path(source, target, nodes, edges))
            }
        };

        tracing::debug!(
            analysis = %request.analysis,
            nodes = nodes.len(),
            edges = edges.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(result)
    }
}

#[async_trait]
impl AnalyticsEngine for GraphAnalyticsEngine {
    async fn analyze(
        &self,
        graph: GraphData,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalyticsError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.run(&graph, &request))
            .await
            .map_err(|e| AnalyticsError::TaskFailed(e.to_string()))?
    }
}

// ============================================================================
// Tests
// ============================================================================
