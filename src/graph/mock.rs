//! Mock analytics engine for testing consumers.
//!
//! Returns a pre-configured `AnalysisResult` without running any algorithm,
//! and remembers the requests it received.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::engine::{AnalysisRequest, AnalysisResult, AnalyticsEngine, AnalyticsError};
use super::models::GraphData;

/// Mock implementation of `AnalyticsEngine` for testing.
///
/// Returns the configured result, or an empty centrality ranking if none.
pub struct MockAnalyticsEngine {
    result: Option<AnalysisResult>,
    pub requests: RwLock<Vec<(GraphData, AnalysisRequest)>>,
}

impl MockAnalyticsEngine {
    /// Create a mock engine that returns an empty ranking.
    pub fn new() -> Self {
        Self {
            result: None,
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Create a mock engine with a pre-configured result.
    pub fn with_result(result: AnalysisResult) -> Self {
        Self {
            result: Some(result),
            requests: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MockAnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsEngine for MockAnalyticsEngine {
    async fn analyze(
        &self,
        graph: GraphData,
        request: AnalysisRequest,
    ) -> Result<AnalysisResult, AnalyticsError> {
        self.requests.write().await.push((graph, request));
        Ok(self
            .result
            .clone()
            .unwrap_or_else(|| AnalysisResult::Centrality(vec![])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::engine::AnalysisType;
    use crate::graph::models::PathResult;

    #[tokio::test]
    async fn test_mock_returns_empty_by_default() {
        let mock = MockAnalyticsEngine::new();
        let result = mock
            .analyze(GraphData::default(), AnalysisRequest::new(AnalysisType::Degree))
            .await
            .unwrap();
        assert_eq!(result, AnalysisResult::Centrality(vec![]));
        assert_eq!(mock.requests.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_returns_configured_result() {
        let configured = AnalysisResult::Path(Some(PathResult::from_path(vec![1, 2])));
        let mock = MockAnalyticsEngine::with_result(configured.clone());
        let result = mock
            .analyze(GraphData::default(), AnalysisRequest::path(1, 2))
            .await
            .unwrap();
        assert_eq!(result, configured);
        assert_eq!(mock.requests.read().await[0].1, AnalysisRequest::path(1, 2));
    }
}
