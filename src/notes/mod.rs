//! Research notes module
//!
//! Notes are the nodes of a user's knowledge graph; links between them are
//! the edges. Links come from explicit requests or from `[[Title]]`
//! references in note content.
//!
//! ## Modules
//! - [`models`] — notes, links, categories, relationship types and DTOs
//! - [`wikilinks`] — `[[Title]]` extraction
//! - [`store`] — the user-scoped [`NoteStore`] trait and its in-memory implementation
//! - [`manager`] — CRUD orchestration and graph snapshots

pub mod manager;
pub mod models;
pub mod store;
pub mod wikilinks;

pub use manager::NoteManager;
pub use models::*;
pub use store::{InMemoryNoteStore, NoteStore};
pub use wikilinks::extract_wiki_links;
