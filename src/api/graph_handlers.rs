//! API handlers for the graph snapshot and analytics

use super::extract::{Json, Path};
use super::handlers::{ApiState, AppError};
use crate::graph::{AnalysisReport, AnalysisRequest, GraphData};
use axum::extract::State;

/// The user's graph: one node per note, one edge per link
pub async fn get_graph(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<GraphData>, AppError> {
    let graph = state.note_manager.graph_data(user_id).await?;
    Ok(Json(graph))
}

/// Run one analysis over the user's graph.
///
/// The response carries the titles of every note the result mentions.
pub async fn run_analytics(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let graph = state.note_manager.graph_data(user_id).await?;

    tracing::debug!(
        user_id,
        analysis = %body.analysis,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "Running analytics"
    );

    let analysis = body.analysis;
    let result = state.analytics.analyze(graph.clone(), body).await?;

    Ok(Json(AnalysisReport::new(analysis, result, &graph)))
}
