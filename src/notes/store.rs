//! Note storage.
//!
//! [`NoteStore`] is the persistence seam used by the manager and the API.
//! Every operation is scoped by the owning user: a note or link belonging
//! to another user behaves exactly like a missing one.
//!
//! [`InMemoryNoteStore`] keeps everything in `tokio::sync::RwLock<HashMap<K, V>>`
//! collections and hands out monotonically increasing integer ids.

use super::models::{CreateLinkRequest, CreateNoteRequest, Link, Note, UpdateNoteRequest};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// User-scoped storage of notes and links.
#[async_trait]
pub trait NoteStore: Send + Sync {
    // Notes

    async fn create_note(&self, user_id: i64, req: &CreateNoteRequest) -> Result<Note>;

    async fn get_note(&self, user_id: i64, note_id: i64) -> Result<Option<Note>>;

    /// All notes of a user, least recently updated first (ties by id)
    async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>>;

    /// Case-insensitive exact title match, with both sides trimmed. On
    /// duplicates the lowest id wins, whatever the update order.
    async fn find_note_by_title(&self, user_id: i64, title: &str) -> Result<Option<Note>>;

    /// Apply the fields present in `req`. Returns `None` if the note does not exist.
    async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        req: &UpdateNoteRequest,
    ) -> Result<Option<Note>>;

    /// Delete a note and every link touching it. Returns whether a note was deleted.
    async fn delete_note(&self, user_id: i64, note_id: i64) -> Result<bool>;

    // Links

    /// Create a link. If the user already links `source` to `target`, the
    /// existing link is returned unchanged.
    async fn create_link(&self, user_id: i64, req: &CreateLinkRequest) -> Result<Link>;

    /// All links of a user, ordered by id
    async fn list_links(&self, user_id: i64) -> Result<Vec<Link>>;

    /// Links touching a note in either direction, ordered by id
    async fn links_for_note(&self, user_id: i64, note_id: i64) -> Result<Vec<Link>>;

    async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<bool>;

    /// Delete every link whose source is `note_id`. Returns the number removed.
    async fn delete_outgoing_links(&self, user_id: i64, note_id: i64) -> Result<usize>;
}

/// In-memory [`NoteStore`].
pub struct InMemoryNoteStore {
    pub notes: RwLock<HashMap<i64, Note>>,
    pub links: RwLock<HashMap<i64, Link>>,
    next_note_id: AtomicI64,
    next_link_id: AtomicI64,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
            links: RwLock::new(HashMap::new()),
            next_note_id: AtomicI64::new(1),
            next_link_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_id(mut links: Vec<Link>) -> Vec<Link> {
    links.sort_by_key(|l| l.id);
    links
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn create_note(&self, user_id: i64, req: &CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: self.next_note_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            title: req.title.clone(),
            content: req.content.clone(),
            category: req.category,
            attributes: req.attributes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.insert(note.id, note.clone());
        Ok(note)
    }

    async fn get_note(&self, user_id: i64, note_id: i64) -> Result<Option<Note>> {
        Ok(self
            .notes
            .read()
            .await
            .get(&note_id)
            .filter(|n| n.user_id == user_id)
            .cloned())
    }

    async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    async fn find_note_by_title(&self, user_id: i64, title: &str) -> Result<Option<Note>> {
        let wanted = title.trim().to_lowercase();
        Ok(self
            .notes
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id && n.title.trim().to_lowercase() == wanted)
            .min_by_key(|n| n.id)
            .cloned())
    }

    async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        req: &UpdateNoteRequest,
    ) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        let Some(note) = notes.get_mut(&note_id).filter(|n| n.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(ref title) = req.title {
            note.title = title.clone();
        }
        if let Some(ref content) = req.content {
            note.content = content.clone();
        }
        if let Some(category) = req.category {
            note.category = Some(category);
        }
        if let Some(ref attributes) = req.attributes {
            note.attributes = Some(attributes.clone());
        }
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, user_id: i64, note_id: i64) -> Result<bool> {
        let removed = {
            let mut notes = self.notes.write().await;
            match notes.get(&note_id) {
                Some(n) if n.user_id == user_id => notes.remove(&note_id).is_some(),
                _ => false,
            }
        };
        if removed {
            self.links
                .write()
                .await
                .retain(|_, l| !(l.user_id == user_id && l.touches(note_id)));
        }
        Ok(removed)
    }

    async fn create_link(&self, user_id: i64, req: &CreateLinkRequest) -> Result<Link> {
        let mut links = self.links.write().await;
        if let Some(existing) = links.values().find(|l| {
            l.user_id == user_id
                && l.source_note_id == req.source_note_id
                && l.target_note_id == req.target_note_id
        }) {
            return Ok(existing.clone());
        }

        let link = Link {
            id: self.next_link_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            source_note_id: req.source_note_id,
            target_note_id: req.target_note_id,
            relationship_type: req.relationship_type,
            evidence: req.evidence.clone(),
            created_at: Utc::now(),
        };
        links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn list_links(&self, user_id: i64) -> Result<Vec<Link>> {
        let links = self.links.read().await;
        Ok(sorted_by_id(
            links
                .values()
                .filter(|l| l.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn links_for_note(&self, user_id: i64, note_id: i64) -> Result<Vec<Link>> {
        let links = self.links.read().await;
        Ok(sorted_by_id(
            links
                .values()
                .filter(|l| l.user_id == user_id && l.touches(note_id))
                .cloned()
                .collect(),
        ))
    }

    async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<bool> {
        let mut links = self.links.write().await;
        match links.get(&link_id) {
            Some(l) if l.user_id == user_id => Ok(links.remove(&link_id).is_some()),
            _ => Ok(false),
        }
    }

    async fn delete_outgoing_links(&self, user_id: i64, note_id: i64) -> Result<usize> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|_, l| !(l.user_id == user_id && l.source_note_id == note_id));
        Ok(before - links.len())
    }
}
