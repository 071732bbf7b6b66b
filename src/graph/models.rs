//! Graph analytics data models.
//!
//! Defines the complete type system for note graph analytics:
//!
//! ## Input types
//! - [`GraphNode`] — a note, reduced to what the algorithms need
//! - [`GraphEdge`] — a link between two notes (stored directed, analysed undirected)
//! - [`GraphData`] — the flat node/edge snapshot handed to the engine
//! - [`AdjacencyMap`] — undirected neighbor lists built from a snapshot
//!
//! ## Output types
//! - [`CentralityResult`] — per-node score, returned sorted descending
//! - [`PathResult`] — one shortest path between two notes
//! - [`Community`] — a group of notes found by label propagation
//!
//! ## Configuration
//! - [`AnalyticsConfig`] — tuning parameters for the analytics engine

use crate::notes::models::NoteCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Note identifier, unique within a user's graph.
pub type NodeId = i64;

/// Mapping from node id to its neighbors, in edge insertion order.
///
/// Neighbor lists may contain ids that are not keys of the map when an
/// edge references a note outside the node list. Such ids have no
/// neighbors of their own.
pub type AdjacencyMap = HashMap<NodeId, Vec<NodeId>>;

// ============================================================================
// Input types
// ============================================================================

/// A note as seen by the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    pub title: String,
    /// Domain category, absent for a plain note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<NoteCategory>,
}

impl GraphNode {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            category: None,
        }
    }
}

/// A link between two notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: i64,
    pub source: NodeId,
    pub target: NodeId,
    /// Free-form relationship label, absent for a basic link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
}

impl GraphEdge {
    pub fn new(id: i64, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            relationship_type: None,
        }
    }
}

/// Flat snapshot of a user's graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }
}

// ============================================================================
// Output types
// ============================================================================

/// Score of a single node for one centrality measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralityResult {
    pub node_id: NodeId,
    pub score: f64,
}

/// A shortest path, source and target inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<NodeId>,
    /// Number of edges traversed (`path.len() - 1`)
    pub length: usize,
}

impl PathResult {
    pub fn from_path(path: Vec<NodeId>) -> Self {
        let length = path.len().saturating_sub(1);
        Self { path, length }
    }
}

/// A group of densely linked notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    /// Sequential identifier, 0-based in discovery order
    pub id: usize,
    /// Member note ids, in input node order
    pub members: Vec<NodeId>,
}

impl Community {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning parameters for the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Maximum label propagation passes (default: 10)
    pub community_max_iterations: usize,
    /// Fixed seed for the label propagation shuffle (default: none, thread RNG)
    pub community_seed: Option<u64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            community_max_iterations: 10,
            community_seed: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
