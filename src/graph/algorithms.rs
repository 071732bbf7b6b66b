//! Graph analytics algorithms.
//!
//! Implements the analytics run over a user's note graph:
//! - **Adjacency construction** — undirected neighbor lists from a flat node/edge list
//! - **Shortest path** — breadth-first search, first path found wins
//! - **All shortest paths** — per-source BFS keeping every minimal-length path
//! - **Degree, betweenness and closeness centrality**
//! - **Community detection** — label propagation with shuffled visitation order
//!
//! All functions are pure: each call builds its own adjacency map and keeps
//! no state between calls. Edges are stored directed but traversed in both
//! directions, so scores describe how connected a note is rather than who
//! cites whom.
//!
//! Results are keyed by the *input* node list. Edges that reference ids
//! outside that list are tolerated: the foreign id shows up as a neighbor
//! without neighbors of its own and never appears in a result.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

use super::models::{
    AdjacencyMap, CentralityResult, Community, GraphEdge, GraphNode, NodeId, PathResult,
};

/// Node ids in input order, duplicates removed (first occurrence wins).
fn unique_ids(nodes: &[GraphNode]) -> Vec<NodeId> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes
        .iter()
        .map(|n| n.id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Neighbors of `id`, empty for ids that are not keys of the map.
fn neighbors(adjacency: &AdjacencyMap, id: NodeId) -> &[NodeId] {
    adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
}

/// Sort scores descending. The sort is stable, so ties keep input order.
fn ranked(scores: impl IntoIterator<Item = (NodeId, f64)>) -> Vec<CentralityResult> {
    let mut results: Vec<CentralityResult> = scores
        .into_iter()
        .map(|(node_id, score)| CentralityResult { node_id, score })
        .collect();
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}

// ============================================================================
// Adjacency construction
// ============================================================================

/// Build the undirected adjacency map for a graph.
///
/// Every input node gets an entry, isolated nodes included. For each edge
/// `(s, t)`, `t` is appended to `s`'s neighbors and `s` to `t`'s. A self-loop
/// therefore lists the node twice in its own neighbors. Endpoints that are
/// not input nodes get no entry of their own.
pub fn build_adjacency(nodes: &[GraphNode], edges: &[GraphEdge]) -> AdjacencyMap {
    let mut adjacency: AdjacencyMap = HashMap::with_capacity(nodes.len());
    for node in nodes {
        adjacency.entry(node.id).or_default();
    }

    for edge in edges {
        if let Some(list) = adjacency.get_mut(&edge.source) {
            list.push(edge.target);
        }
        if let Some(list) = adjacency.get_mut(&edge.target) {
            list.push(edge.source);
        }
    }

    adjacency
}

// ============================================================================
// Shortest paths
// ============================================================================

/// Find one shortest path between two notes.
///
/// Returns `None` when either id is not an input node or when the target is
/// unreachable. Among several shortest paths, the one found first while
/// expanding neighbors in edge insertion order is returned.
pub fn shortest_path(
    source: NodeId,
    target: NodeId,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
) -> Option<PathResult> {
    let adjacency = build_adjacency(nodes, edges);
    shortest_path_in(&adjacency, source, target)
}

/// [`shortest_path`] over a prebuilt adjacency map.
pub fn shortest_path_in(
    adjacency: &AdjacencyMap,
    source: NodeId,
    target: NodeId,
) -> Option<PathResult> {
    if !adjacency.contains_key(&source) || !adjacency.contains_key(&target) {
        return None;
    }

    // predecessor of each visited node on the BFS tree
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::from([source]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        if current == target {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(&prev) = parent.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some(PathResult::from_path(path));
        }

        for &neighbor in neighbors(adjacency, current) {
            if visited.insert(neighbor) {
                parent.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// Enumerate every shortest path from `source` to each reachable node.
///
/// A node's distance is fixed on first arrival; later arrivals at the same
/// distance add another path, longer ones are dropped. The source maps to
/// the single path `[source]`, unreached nodes are absent.
///
/// The number of paths grows exponentially with the number of equal-length
/// alternatives (grids, dense clusters). Personal note graphs of a few
/// hundred notes stay well within reach; much larger graphs do not.
pub fn all_shortest_paths(
    source: NodeId,
    adjacency: &AdjacencyMap,
) -> HashMap<NodeId, Vec<Vec<NodeId>>> {
    let mut paths: HashMap<NodeId, Vec<Vec<NodeId>>> = HashMap::new();
    let mut distances: HashMap<NodeId, usize> = HashMap::from([(source, 0)]);
    let mut queue: VecDeque<(NodeId, Vec<NodeId>, usize)> =
        VecDeque::from([(source, vec![source], 0)]);

    while let Some((current, path, dist)) = queue.pop_front() {
        let next_dist = dist + 1;
        for &neighbor in neighbors(adjacency, current) {
            let settled = distances.get(&neighbor).copied();
            if settled.is_none_or(|d| d >= next_dist) {
                distances.insert(neighbor, next_dist);
                let mut extended = path.clone();
                extended.push(neighbor);
                queue.push_back((neighbor, extended, next_dist));
            }
        }

        let recorded = paths.entry(current).or_default();
        if distances.get(&current) == Some(&dist) {
            recorded.push(path);
        }
    }

    paths
}

/// Hop distance from `source` to every reachable node (source included, at 0).
pub fn bfs_distances(source: NodeId, adjacency: &AdjacencyMap) -> HashMap<NodeId, usize> {
    let mut distances: HashMap<NodeId, usize> = HashMap::from([(source, 0)]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        let next_dist = distances[&current] + 1;
        for &neighbor in neighbors(adjacency, current) {
            if !distances.contains_key(&neighbor) {
                distances.insert(neighbor, next_dist);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

// ============================================================================
// Centrality
// ============================================================================

/// Degree centrality: number of edge endpoints touching each node.
///
/// An edge `A → B` counts once for `A` and once for `B`. Isolated nodes are
/// reported with a score of 0.
pub fn degree_centrality(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<CentralityResult> {
    let adjacency = build_adjacency(nodes, edges);
    ranked(
        unique_ids(nodes)
            .into_iter()
            .map(|id| (id, neighbors(&adjacency, id).len() as f64)),
    )
}

/// Betweenness centrality over all shortest paths.
///
/// For every ordered pair `(s, t)` with `s ≠ t`, each node strictly inside a
/// shortest path gets one credit *per path*. Credits are not divided by the
/// number of alternative shortest paths for the pair, unlike Brandes'
/// formulation. The total is divided by `(n-1)(n-2)/2`; with two nodes or
/// fewer every score is 0.
pub fn betweenness_centrality(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<CentralityResult> {
    let ids = unique_ids(nodes);
    let adjacency = build_adjacency(nodes, edges);

    let mut credit: HashMap<NodeId, f64> = ids.iter().map(|&id| (id, 0.0)).collect();

    for &source in &ids {
        let paths = all_shortest_paths(source, &adjacency);
        for &target in &ids {
            if target == source {
                continue;
            }
            let Some(to_target) = paths.get(&target) else {
                continue;
            };
            for path in to_target.iter().filter(|p| p.len() > 2) {
                for intermediate in &path[1..path.len() - 1] {
                    if let Some(c) = credit.get_mut(intermediate) {
                        *c += 1.0;
                    }
                }
            }
        }
    }

    let n = ids.len();
    let normalizer = if n > 2 {
        ((n - 1) * (n - 2)) as f64 / 2.0
    } else {
        0.0
    };

    ranked(ids.into_iter().map(|id| {
        let score = if normalizer > 0.0 {
            credit[&id] / normalizer
        } else {
            0.0
        };
        (id, score)
    }))
}

/// Closeness centrality over the reachable part of the graph.
///
/// `score = (n - 1) / Σ d(v, u)` where the sum only runs over nodes reachable
/// from `v` and `n` is the total node count. Unreachable nodes contribute
/// nothing, so a node in a small component can outscore one in a large
/// component. A node that reaches nothing scores 0.
pub fn closeness_centrality(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<CentralityResult> {
    let ids = unique_ids(nodes);
    let adjacency = build_adjacency(nodes, edges);
    let n = ids.len();

    ranked(ids.into_iter().map(|id| {
        let total: usize = bfs_distances(id, &adjacency).values().sum();
        let score = if total > 0 {
            (n - 1) as f64 / total as f64
        } else {
            0.0
        };
        (id, score)
    }))
}

// ============================================================================
// Community detection (label propagation)
// ============================================================================

/// Detect communities with label propagation, shuffling with the thread RNG.
///
/// See [`detect_communities_with_rng`].
pub fn detect_communities(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    max_iterations: usize,
) -> Vec<Community> {
    detect_communities_with_rng(nodes, edges, max_iterations, &mut rand::rng())
}

/// Detect communities with label propagation.
///
/// Every node starts with its own id as label. Each pass visits the nodes in
/// a freshly shuffled order; a node with neighbors adopts the label carried
/// by most of them, ties going to the label met first in neighbor order.
/// Stops after a pass without changes or after `max_iterations` passes.
///
/// Nodes are then grouped by label, singleton groups are dropped and the
/// remaining groups are numbered from 0 in discovery order.
pub fn detect_communities_with_rng<R: Rng + ?Sized>(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    max_iterations: usize,
    rng: &mut R,
) -> Vec<Community> {
    let ids = unique_ids(nodes);
    let adjacency = build_adjacency(nodes, edges);

    let mut labels: HashMap<NodeId, NodeId> = ids.iter().map(|&id| (id, id)).collect();
    let mut order = ids.clone();

    for iteration in 0..max_iterations {
        order.shuffle(rng);
        let mut changed = false;

        for &node in &order {
            let current = labels[&node];
            let Some(best) = majority_label(neighbors(&adjacency, node), &labels) else {
                continue;
            };
            if best != current {
                labels.insert(node, best);
                changed = true;
            }
        }

        if !changed {
            tracing::trace!(iteration, "label propagation converged");
            break;
        }
    }

    // Group by final label in node order
    let mut group_of_label: HashMap<NodeId, usize> = HashMap::new();
    let mut groups: Vec<Vec<NodeId>> = Vec::new();
    for &id in &ids {
        let label = labels[&id];
        let index = *group_of_label.entry(label).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[index].push(id);
    }

    groups
        .into_iter()
        .filter(|members| members.len() > 1)
        .enumerate()
        .map(|(id, members)| Community { id, members })
        .collect()
}

/// Most frequent label among `neighbors`, first encountered on ties.
///
/// A neighbor outside the label map (an id not in the input node list)
/// carries its own id. Returns `None` when there are no neighbors.
fn majority_label(neighbors: &[NodeId], labels: &HashMap<NodeId, NodeId>) -> Option<NodeId> {
    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    let mut encountered: Vec<NodeId> = Vec::new();

    for &neighbor in neighbors {
        let label = labels.get(&neighbor).copied().unwrap_or(neighbor);
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            encountered.push(label);
        }
        *count += 1;
    }

    let mut best = None;
    let mut best_count = 0;
    for label in encountered {
        let count = counts[&label];
        if count > best_count {
            best = Some(label);
            best_count = count;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
