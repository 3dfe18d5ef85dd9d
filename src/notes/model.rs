//! Note data type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as the notes service reports it.
///
/// The id is always server-assigned. On the wire the fields are `_id`,
/// `content`, `userId` and `createdAt` (ISO-8601).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Body of `GET /notes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteList {
    #[serde(default)]
    pub notes: Vec<Note>,
}
