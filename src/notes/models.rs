//! Research note models and DTOs
//!
//! Notes are the nodes of a user's knowledge graph. A note may carry a
//! category (actor, event, claim, ...) with free-form attributes; links
//! between notes may carry a typed relationship and supporting evidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum title length, in characters
pub const MAX_TITLE_LEN: usize = 500;

// ============================================================================
// Core Enums
// ============================================================================

/// Domain category of a note. A note without category is a plain note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NoteCategory {
    /// A person or organisation
    Actor,
    /// Something that happened at a given time and place
    Event,
    /// A lasting state of affairs (famine, debt, unrest)
    Condition,
    /// A body of ideas
    Ideology,
    /// A document or author the research relies on
    Source,
    /// An assertion that can be supported or refuted
    Claim,
    /// A research methodology
    Method,
}

impl NoteCategory {
    pub const ALL: [NoteCategory; 7] = [
        Self::Actor,
        Self::Event,
        Self::Condition,
        Self::Ideology,
        Self::Source,
        Self::Claim,
        Self::Method,
    ];
}

impl fmt::Display for NoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => write!(f, "Actor"),
            Self::Event => write!(f, "Event"),
            Self::Condition => write!(f, "Condition"),
            Self::Ideology => write!(f, "Ideology"),
            Self::Source => write!(f, "Source"),
            Self::Claim => write!(f, "Claim"),
            Self::Method => write!(f, "Method"),
        }
    }
}

impl FromStr for NoteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "actor" => Ok(Self::Actor),
            "event" => Ok(Self::Event),
            "condition" => Ok(Self::Condition),
            "ideology" => Ok(Self::Ideology),
            "source" => Ok(Self::Source),
            "claim" => Ok(Self::Claim),
            "method" => Ok(Self::Method),
            _ => Err(format!("Unknown note category: {}", s)),
        }
    }
}

/// Typed relationship carried by a link. A link without type is a basic link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    IsSupportedBy,
    IsContradictedBy,
    Critiques,
    BuildsOn,
    Refutes,
    IsCausedBy,
    LeadsTo,
    UsesMethodFrom,
    AppliesFrameworkOf,
    ProvidesEvidenceFor,
    Affected,
    LedBy,
    TakenBy,
    Challenged,
    Embodies,
    Burdened,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 16] = [
        Self::IsSupportedBy,
        Self::IsContradictedBy,
        Self::Critiques,
        Self::BuildsOn,
        Self::Refutes,
        Self::IsCausedBy,
        Self::LeadsTo,
        Self::UsesMethodFrom,
        Self::AppliesFrameworkOf,
        Self::ProvidesEvidenceFor,
        Self::Affected,
        Self::LedBy,
        Self::TakenBy,
        Self::Challenged,
        Self::Embodies,
        Self::Burdened,
    ];

    /// Wire name, e.g. `IS_SUPPORTED_BY`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IsSupportedBy => "IS_SUPPORTED_BY",
            Self::IsContradictedBy => "IS_CONTRADICTED_BY",
            Self::Critiques => "CRITIQUES",
            Self::BuildsOn => "BUILDS_ON",
            Self::Refutes => "REFUTES",
            Self::IsCausedBy => "IS_CAUSED_BY",
            Self::LeadsTo => "LEADS_TO",
            Self::UsesMethodFrom => "USES_METHOD_FROM",
            Self::AppliesFrameworkOf => "APPLIES_FRAMEWORK_OF",
            Self::ProvidesEvidenceFor => "PROVIDES_EVIDENCE_FOR",
            Self::Affected => "AFFECTED",
            Self::LedBy => "LED_BY",
            Self::TakenBy => "TAKEN_BY",
            Self::Challenged => "CHALLENGED",
            Self::Embodies => "EMBODIES",
            Self::Burdened => "BURDENED",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| format!("Unknown relationship type: {}", s))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Validation failures raised by the note manager.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("Invalid title: {0}")]
    InvalidTitle(String),
    #[error("Note {0} not found")]
    NoteNotFound(i64),
    #[error("A note cannot link to itself")]
    SelfLink,
}

/// Check a note title: non-empty after trimming, at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), NoteError> {
    if title.trim().is_empty() {
        return Err(NoteError::InvalidTitle("title must not be empty".into()));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(NoteError::InvalidTitle(format!(
            "title is {} characters long, maximum is {}",
            len, MAX_TITLE_LEN
        )));
    }
    Ok(())
}

// ============================================================================
// Note & Link
// ============================================================================

/// A research note owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    /// Markdown body; `[[Title]]` references become links
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<NoteCategory>,
    /// Category-specific attributes (role, date, author, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A directed link between two notes of the same user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub user_id: i64,
    pub source_note_id: i64,
    pub target_note_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
    /// Quote or reference backing a typed relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Whether this link touches the given note, in either direction
    pub fn touches(&self, note_id: i64) -> bool {
        self.source_note_id == note_id || self.target_note_id == note_id
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request to create a note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: Option<NoteCategory>,
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Request to update a note. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<NoteCategory>,
    pub attributes: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Request to link two notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub source_note_id: i64,
    pub target_note_id: i64,
    pub relationship_type: Option<RelationshipType>,
    pub evidence: Option<String>,
}

impl CreateLinkRequest {
    /// A basic link with no relationship type
    pub fn basic(source_note_id: i64, target_note_id: i64) -> Self {
        Self {
            source_note_id,
            target_note_id,
            relationship_type: None,
            evidence: None,
        }
    }
}
