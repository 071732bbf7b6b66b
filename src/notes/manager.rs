//! Note Manager - CRUD operations for research notes
//!
//! Provides high-level operations over a [`NoteStore`]: title validation,
//! wiki-link synchronisation (`[[Title]]` references in content become
//! links), explicit link management and the graph snapshot handed to the
//! analytics engine.

use super::models::*;
use super::store::NoteStore;
use super::wikilinks::extract_wiki_links;
use crate::graph::models::{GraphData, GraphEdge, GraphNode};
use anyhow::Result;
use std::sync::Arc;

/// Manager for note and link operations
pub struct NoteManager {
    store: Arc<dyn NoteStore>,
}

impl NoteManager {
    /// Create a new NoteManager
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Create a note and link it to every existing note it references.
    pub async fn create_note(&self, user_id: i64, req: CreateNoteRequest) -> Result<Note> {
        validate_title(&req.title)?;

        let note = self.store.create_note(user_id, &req).await?;
        let linked = self.sync_wiki_links(user_id, &note).await?;

        tracing::info!(
            user_id,
            note_id = note.id,
            wiki_links = linked,
            "Created note"
        );
        Ok(note)
    }

    /// Get a note by id
    pub async fn get_note(&self, user_id: i64, note_id: i64) -> Result<Option<Note>> {
        self.store.get_note(user_id, note_id).await
    }

    /// List a user's notes, least recently updated first
    pub async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>> {
        self.store.list_notes(user_id).await
    }

    /// Update a note.
    ///
    /// When the content changes, the note's outgoing links are dropped and
    /// rebuilt from the wiki references of the new content. This also drops
    /// typed outgoing links created by hand.
    pub async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        req: UpdateNoteRequest,
    ) -> Result<Option<Note>> {
        if let Some(ref title) = req.title {
            validate_title(title)?;
        }

        let Some(note) = self.store.update_note(user_id, note_id, &req).await? else {
            return Ok(None);
        };

        if req.content.is_some() {
            let removed = self.store.delete_outgoing_links(user_id, note_id).await?;
            let linked = self.sync_wiki_links(user_id, &note).await?;
            tracing::debug!(
                user_id,
                note_id,
                removed,
                linked,
                "Resynchronised wiki links"
            );
        }

        Ok(Some(note))
    }

    /// Delete a note and every link touching it
    pub async fn delete_note(&self, user_id: i64, note_id: i64) -> Result<bool> {
        let deleted = self.store.delete_note(user_id, note_id).await?;
        if deleted {
            tracing::info!(user_id, note_id, "Deleted note");
        }
        Ok(deleted)
    }

    /// Create a basic link for each `[[Title]]` in the note that resolves to
    /// another note of the user. Returns the number of links ensured.
    async fn sync_wiki_links(&self, user_id: i64, note: &Note) -> Result<usize> {
        let mut linked = 0;
        for title in extract_wiki_links(&note.content) {
            match self.store.find_note_by_title(user_id, &title).await? {
                Some(target) if target.id != note.id => {
                    self.store
                        .create_link(user_id, &CreateLinkRequest::basic(note.id, target.id))
                        .await?;
                    linked += 1;
                }
                Some(_) => {}
                None => {
                    tracing::debug!(
                        user_id,
                        note_id = note.id,
                        title = %title,
                        "Unresolved wiki link"
                    );
                }
            }
        }
        Ok(linked)
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Link two existing notes of the user
    pub async fn create_link(&self, user_id: i64, req: CreateLinkRequest) -> Result<Link> {
        if req.source_note_id == req.target_note_id {
            return Err(NoteError::SelfLink.into());
        }
        for note_id in [req.source_note_id, req.target_note_id] {
            if self.store.get_note(user_id, note_id).await?.is_none() {
                return Err(NoteError::NoteNotFound(note_id).into());
            }
        }

        let link = self.store.create_link(user_id, &req).await?;
        tracing::info!(
            user_id,
            link_id = link.id,
            source = link.source_note_id,
            target = link.target_note_id,
            "Created link"
        );
        Ok(link)
    }

    /// Delete a link
    pub async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<bool> {
        self.store.delete_link(user_id, link_id).await
    }

    /// List all links of a user
    pub async fn list_links(&self, user_id: i64) -> Result<Vec<Link>> {
        self.store.list_links(user_id).await
    }

    /// Links touching a note in either direction
    pub async fn links_for_note(&self, user_id: i64, note_id: i64) -> Result<Vec<Link>> {
        if self.store.get_note(user_id, note_id).await?.is_none() {
            return Err(NoteError::NoteNotFound(note_id).into());
        }
        self.store.links_for_note(user_id, note_id).await
    }

    // ========================================================================
    // Graph
    // ========================================================================

    /// Snapshot of the user's graph: one node per note, one edge per link
    pub async fn graph_data(&self, user_id: i64) -> Result<GraphData> {
        let notes = self.store.list_notes(user_id).await?;
        let links = self.store.list_links(user_id).await?;

        let nodes = notes
            .into_iter()
            .map(|n| GraphNode {
                id: n.id,
                title: n.title,
                category: n.category,
            })
            .collect();
        let edges = links
            .into_iter()
            .map(|l| GraphEdge {
                id: l.id,
                source: l.source_note_id,
                target: l.target_note_id,
                relationship_type: l.relationship_type.map(|r| r.to_string()),
            })
            .collect();

        Ok(GraphData::new(nodes, edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::store::InMemoryNoteStore;

    fn manager() -> NoteManager {
        NoteManager::new(Arc::new(InMemoryNoteStore::new()))
    }

    fn note(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn link_pairs(links: &[Link]) -> Vec<(i64, i64)> {
        links
            .iter()
            .map(|l| (l.source_note_id, l.target_note_id))
            .collect()
    }

    #[tokio::test]
    async fn test_create_note_rejects_invalid_title() {
        let m = manager();
        let err = m.create_note(1, note("  ", "")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NoteError>(),
            Some(NoteError::InvalidTitle(_))
        ));

        let err = m
            .create_note(1, note(&"x".repeat(MAX_TITLE_LEN + 1), ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NoteError>(),
            Some(NoteError::InvalidTitle(_))
        ));
        assert!(m.list_notes(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_note_links_resolved_wiki_titles() {
        let m = manager();
        let famine = m.create_note(1, note("Famine", "")).await.unwrap();
        let debt = m.create_note(1, note("Debt crisis", "")).await.unwrap();
        let revolution = m
            .create_note(
                1,
                note(
                    "Revolution",
                    "Caused by [[famine]], [[Debt crisis]] and [[Enlightenment]].",
                ),
            )
            .await
            .unwrap();

        let links = m.list_links(1).await.unwrap();
        assert_eq!(
            link_pairs(&links),
            vec![(revolution.id, famine.id), (revolution.id, debt.id)]
        );
        assert!(links.iter().all(|l| l.relationship_type.is_none()));
    }

    #[tokio::test]
    async fn test_wiki_links_do_not_cross_users() {
        let m = manager();
        m.create_note(2, note("Famine", "")).await.unwrap();
        m.create_note(1, note("Revolution", "[[Famine]]")).await.unwrap();
        assert!(m.list_links(1).await.unwrap().is_empty());
        assert!(m.list_links(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_note_resyncs_outgoing_links() {
        let m = manager();
        let a = m.create_note(1, note("A", "")).await.unwrap();
        let b = m.create_note(1, note("B", "")).await.unwrap();
        let c = m.create_note(1, note("C", "[[A]]")).await.unwrap();
        // incoming link to C must survive C's update
        m.create_link(1, CreateLinkRequest::basic(b.id, c.id))
            .await
            .unwrap();

        let updated = m
            .update_note(
                1,
                c.id,
                UpdateNoteRequest {
                    content: Some("Now about [[B]] and [[C]]".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "Now about [[B]] and [[C]]");

        let links = m.list_links(1).await.unwrap();
        let pairs = link_pairs(&links);
        assert!(pairs.contains(&(b.id, c.id)));
        assert!(pairs.contains(&(c.id, b.id)));
        assert!(!pairs.contains(&(c.id, a.id)));
        assert!(!pairs.contains(&(c.id, c.id)), "self reference must be skipped");
    }

    #[tokio::test]
    async fn test_update_without_content_keeps_links() {
        let m = manager();
        let a = m.create_note(1, note("A", "")).await.unwrap();
        let b = m.create_note(1, note("B", "[[A]]")).await.unwrap();

        m.update_note(
            1,
            b.id,
            UpdateNoteRequest {
                title: Some("B renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(link_pairs(&m.list_links(1).await.unwrap()), vec![(b.id, a.id)]);
    }

    #[tokio::test]
    async fn test_update_missing_note_is_none() {
        let m = manager();
        let result = m
            .update_note(1, 42, UpdateNoteRequest::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_title() {
        let m = manager();
        let a = m.create_note(1, note("A", "")).await.unwrap();
        let err = m
            .update_note(
                1,
                a.id,
                UpdateNoteRequest {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<NoteError>().is_some());
        assert_eq!(m.get_note(1, a.id).await.unwrap().unwrap().title, "A");
    }

    #[tokio::test]
    async fn test_create_link_validation() {
        let m = manager();
        let a = m.create_note(1, note("A", "")).await.unwrap();
        let foreign = m.create_note(2, note("B", "")).await.unwrap();

        let err = m
            .create_link(1, CreateLinkRequest::basic(a.id, a.id))
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<NoteError>(), Some(&NoteError::SelfLink));

        let err = m
            .create_link(1, CreateLinkRequest::basic(a.id, foreign.id))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<NoteError>(),
            Some(&NoteError::NoteNotFound(foreign.id))
        );
    }

    #[tokio::test]
    async fn test_delete_note_cascades() {
        let m = manager();
        let a = m.create_note(1, note("A", "")).await.unwrap();
        let b = m.create_note(1, note("B", "[[A]]")).await.unwrap();
        assert_eq!(m.links_for_note(1, a.id).await.unwrap().len(), 1);

        assert!(m.delete_note(1, a.id).await.unwrap());
        assert!(m.links_for_note(1, b.id).await.unwrap().is_empty());
        assert!(m.links_for_note(1, a.id).await.is_err());
    }

    #[tokio::test]
    async fn test_graph_data_snapshot() {
        use crate::notes::models::{NoteCategory, RelationshipType};

        let m = manager();
        let king = m
            .create_note(
                1,
                CreateNoteRequest {
                    title: "Louis XVI".into(),
                    category: Some(NoteCategory::Actor),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let flight = m.create_note(1, note("Flight to Varennes", "")).await.unwrap();
        m.create_link(
            1,
            CreateLinkRequest {
                source_note_id: flight.id,
                target_note_id: king.id,
                relationship_type: Some(RelationshipType::TakenBy),
                evidence: Some("June 1791".into()),
            },
        )
        .await
        .unwrap();
        m.create_note(2, note("Elsewhere", "")).await.unwrap();

        let graph = m.graph_data(1).await.unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].category, Some(NoteCategory::Actor));
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, flight.id);
        assert_eq!(graph.edges[0].target, king.id);
        assert_eq!(graph.edges[0].relationship_type.as_deref(), Some("TAKEN_BY"));
    }
}
