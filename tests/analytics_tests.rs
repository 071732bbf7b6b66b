//! Analytics integration tests
//!
//! Exercise the public algorithm and engine API on the reference graphs
//! (chain, disconnected pair, star) and on a randomly generated graph.

use notegraph::graph::algorithms::{
    betweenness_centrality, build_adjacency, closeness_centrality, degree_centrality,
    detect_communities, detect_communities_with_rng, shortest_path,
};
use notegraph::graph::{
    AnalysisRequest, AnalysisResult, AnalysisType, AnalyticsConfig, AnalyticsEngine,
    CentralityResult, GraphAnalyticsEngine, GraphData, GraphEdge, GraphNode, NodeId,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

fn graph(ids: &[NodeId], pairs: &[(NodeId, NodeId)]) -> GraphData {
    GraphData::new(
        ids.iter()
            .map(|&id| GraphNode::new(id, format!("Note {}", id)))
            .collect(),
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(s, t))| GraphEdge::new(i as i64, s, t))
            .collect(),
    )
}

fn chain() -> GraphData {
    graph(&[1, 2, 3, 4, 5], &[(1, 2), (2, 3), (3, 4), (4, 5)])
}

fn disconnected() -> GraphData {
    graph(&[1, 2, 3, 4], &[(1, 2), (3, 4)])
}

fn star() -> GraphData {
    graph(&[1, 2, 3, 4, 5], &[(1, 2), (1, 3), (1, 4), (1, 5)])
}

/// Random graph from a fixed seed: `n` nodes, each candidate pair kept
/// when it falls in the first `keep` slots of a shuffled pair list.
fn random_graph(seed: u64, n: i64, keep: usize) -> GraphData {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<NodeId> = (1..=n).collect();
    let mut pairs: Vec<(NodeId, NodeId)> = Vec::new();
    for a in 1..=n {
        for b in (a + 1)..=n {
            pairs.push((a, b));
        }
    }
    pairs.shuffle(&mut rng);
    pairs.truncate(keep);
    graph(&ids, &pairs)
}

fn by_id(results: &[CentralityResult]) -> HashMap<NodeId, f64> {
    results.iter().map(|r| (r.node_id, r.score)).collect()
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_chain_scenario() {
    let g = chain();

    let degree = by_id(&degree_centrality(&g.nodes, &g.edges));
    let expected: HashMap<NodeId, f64> =
        HashMap::from([(1, 1.0), (2, 2.0), (3, 2.0), (4, 2.0), (5, 1.0)]);
    assert_eq!(degree, expected);

    let path = shortest_path(1, 5, &g.nodes, &g.edges).unwrap();
    assert_eq!(path.path, vec![1, 2, 3, 4, 5]);
    assert_eq!(path.length, 4);

    let betweenness = by_id(&betweenness_centrality(&g.nodes, &g.edges));
    assert!(betweenness[&3] > betweenness[&2]);
    assert!(betweenness[&3] > betweenness[&4]);
}

#[test]
fn test_disconnected_scenario() {
    let g = disconnected();
    assert!(shortest_path(1, 4, &g.nodes, &g.edges).is_none());

    let closeness = by_id(&closeness_centrality(&g.nodes, &g.edges));
    assert_eq!(closeness[&1], 3.0);
}

#[test]
fn test_star_scenario() {
    let g = star();

    let degree = degree_centrality(&g.nodes, &g.edges);
    assert_eq!(degree[0].node_id, 1);
    assert_eq!(degree[0].score, 4.0);
    assert!(degree[1..].iter().all(|r| r.score == 1.0));

    let betweenness = betweenness_centrality(&g.nodes, &g.edges);
    assert_eq!(betweenness[0].node_id, 1);
    assert_eq!(betweenness[0].score, 2.0);

    let communities = detect_communities(&g.nodes, &g.edges, 1000);
    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].size(), 5);
}

#[test]
fn test_no_edges_no_communities() {
    let g = graph(&[1, 2, 3, 4, 5, 6], &[]);
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert!(detect_communities_with_rng(&g.nodes, &g.edges, 10, &mut rng).is_empty());
    }
}

// ============================================================================
// Properties over random graphs
// ============================================================================

#[test]
fn test_degree_sum_on_random_graphs() {
    for seed in 0..10 {
        let g = random_graph(seed, 12, 20);
        let total: f64 = degree_centrality(&g.nodes, &g.edges)
            .iter()
            .map(|r| r.score)
            .sum();
        assert_eq!(total, 2.0 * g.edges.len() as f64, "seed {}", seed);
    }
}

#[test]
fn test_path_properties_on_random_graphs() {
    for seed in 0..5 {
        let g = random_graph(seed, 10, 14);
        for a in 1..=10 {
            let reflexive = shortest_path(a, a, &g.nodes, &g.edges).unwrap();
            assert_eq!(reflexive.path, vec![a]);
            assert_eq!(reflexive.length, 0);

            for b in 1..=10 {
                let ab = shortest_path(a, b, &g.nodes, &g.edges).map(|p| p.length);
                let ba = shortest_path(b, a, &g.nodes, &g.edges).map(|p| p.length);
                assert_eq!(ab, ba, "seed {} pair ({}, {})", seed, a, b);
            }
        }
    }
}

#[test]
fn test_betweenness_leaves_and_sign_on_random_graphs() {
    for seed in 0..5 {
        let g = random_graph(seed, 10, 12);
        let adjacency = build_adjacency(&g.nodes, &g.edges);
        let betweenness = by_id(&betweenness_centrality(&g.nodes, &g.edges));
        for (id, score) in &betweenness {
            assert!(*score >= 0.0);
            if adjacency[id].len() == 1 {
                assert_eq!(*score, 0.0, "leaf {} on seed {}", id, seed);
            }
        }
    }
}

#[test]
fn test_results_sorted_descending() {
    let g = random_graph(7, 15, 25);
    for results in [
        degree_centrality(&g.nodes, &g.edges),
        betweenness_centrality(&g.nodes, &g.edges),
        closeness_centrality(&g.nodes, &g.edges),
    ] {
        assert_eq!(results.len(), 15);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn test_communities_partition_nodes() {
    let g = random_graph(3, 20, 30);
    let mut rng = StdRng::seed_from_u64(3);
    let communities = detect_communities_with_rng(&g.nodes, &g.edges, 10, &mut rng);
    let mut seen = std::collections::HashSet::new();
    for (i, c) in communities.iter().enumerate() {
        assert_eq!(c.id, i);
        assert!(c.size() >= 2);
        assert!(c.members.iter().all(|m| seen.insert(*m)));
    }
}

// ============================================================================
// Engine
// ============================================================================

#[tokio::test]
async fn test_engine_seeded_communities_reproducible() {
    let engine = GraphAnalyticsEngine::new(AnalyticsConfig {
        community_max_iterations: 10,
        community_seed: Some(2024),
    });
    let g = random_graph(11, 16, 24);
    let request = AnalysisRequest::new(AnalysisType::Communities);

    let first = engine.analyze(g.clone(), request.clone()).await.unwrap();
    let second = engine.analyze(g, request).await.unwrap();
    assert_eq!(first, second);
    assert!(matches!(first, AnalysisResult::Communities(_)));
}

#[tokio::test]
async fn test_engine_path_through_star() {
    let engine = GraphAnalyticsEngine::default();
    let result = engine
        .analyze(star(), AnalysisRequest::path(3, 5))
        .await
        .unwrap();
    let AnalysisResult::Path(Some(path)) = result else {
        panic!("expected a path");
    };
    assert_eq!(path.path, vec![3, 1, 5]);
    assert_eq!(path.length, 2);
}
