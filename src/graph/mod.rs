//! Graph analytics engine.
//!
//! Computes structural metrics over a user's note graph: degree,
//! betweenness and closeness centrality, shortest paths and label
//! propagation communities. Everything runs in-process on a flat
//! node/edge snapshot; links are treated as undirected.
//!
//! ## Architecture
//!
//! ```text
//! NoteManager::graph_data ──► GraphData (nodes, edges)
//!                                  │
//!                          build_adjacency
//!                                  │
//!                             algorithms
//!                                  │
//!                  AnalyticsEngine (one analysis per request)
//!                                  │
//!                           AnalysisResult
//! ```
//!
//! ## Modules
//!
//! - [`models`] — Data structures (GraphNode, GraphEdge, GraphData, results, AnalyticsConfig)
//! - [`algorithms`] — Adjacency, BFS paths, centralities, label propagation
//! - [`engine`] — `AnalyticsEngine` trait and `GraphAnalyticsEngine` dispatcher
//! - [`mock`] — `MockAnalyticsEngine` for testing (cfg(test) only)

pub mod algorithms;
pub mod engine;
pub mod models;

#[cfg(test)]
pub mod mock;

// Re-export primary types for convenience
pub use engine::{
    AnalysisReport, AnalysisRequest, AnalysisResult, AnalysisType, AnalyticsEngine, AnalyticsError,
    GraphAnalyticsEngine,
};
pub use models::{
    AdjacencyMap, AnalyticsConfig, CentralityResult, Community, GraphData, GraphEdge, GraphNode,
    NodeId, PathResult,
};
