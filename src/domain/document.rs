// ==========================================
// Translator Docs - document and translator models
// ==========================================
// Document: produced by the import pipeline (or CRUD)
// Translator: read-only reference for the import pipeline
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Document
// ==========================================
// Either fully valid and attached to a batch, or never built.
// Aligned with the `document` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<i64>,               // storage-assigned
    pub subject: String,               // required
    pub content: String,               // required
    pub location: String,              // locale code, may be empty
    pub author: String,                // required
    pub translator_id: Option<i64>,    // required, checked by the validation ruleset
    pub import_id: Option<i64>,        // owning batch (back-link by id)
}

impl Document {
    /// Build an unsaved document draft
    pub fn draft(
        subject: impl Into<String>,
        content: impl Into<String>,
        location: impl Into<String>,
        author: impl Into<String>,
        translator_id: Option<i64>,
    ) -> Self {
        Self {
            id: None,
            subject: subject.into(),
            content: content.into(),
            location: location.into(),
            author: author.into(),
            translator_id,
            import_id: None,
        }
    }

    /// Content without the storage-assigned identities, for comparing runs
    pub fn same_content(&self, other: &Document) -> bool {
        self.subject == other.subject
            && self.content == other.content
            && self.location == other.location
            && self.author == other.author
            && self.translator_id == other.translator_id
    }
}

// ==========================================
// Translator
// ==========================================
// Aligned with the `translator` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translator {
    pub id: i64,
    pub name: String,
    pub email: String,            // lookup key for imports (exact match)
    pub source_language: String,
    pub target_language: String,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// NewTranslator - insert payload
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTranslator {
    pub name: String,
    pub email: String,
    pub source_language: String,
    pub target_language: String,
}
