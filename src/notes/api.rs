//! Notes service endpoints.
//!
//! | Call | Success body |
//! |------|--------------|
//! | `GET /notes` | `{notes: Note[]}` |
//! | `POST /notes {content}` | `Note` |
//! | `PUT /notes/{id} {content}` | `Note` |
//! | `DELETE /notes/{id}` | empty |

use serde::Serialize;

use super::model::{Note, NoteList};
use crate::api::client::{decode, transport_status};
use crate::api::ApiClient;
use crate::error::{NotelyError, NotelyResult};
use crate::traits::Response;

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

/// Client for the notes service.
#[derive(Clone)]
pub struct NotesApi {
    client: ApiClient,
}

impl NotesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> NotelyResult<Vec<Note>> {
        let response = self.client.get("/notes").await?;
        check(&response, None)?;
        let list: NoteList = decode(&response)?;
        Ok(list.notes)
    }

    pub async fn create(&self, content: &str) -> NotelyResult<Note> {
        let response = self
            .client
            .post("/notes", &ContentBody { content })
            .await?;
        check(&response, None)?;
        decode(&response)
    }

    pub async fn update(&self, id: &str, content: &str) -> NotelyResult<Note> {
        let response = self
            .client
            .put(&note_path(id), &ContentBody { content })
            .await?;
        check(&response, Some(id))?;
        decode(&response)
    }

    pub async fn delete(&self, id: &str) -> NotelyResult<()> {
        let response = self.client.delete(&note_path(id)).await?;
        check(&response, Some(id))
    }
}

fn note_path(id: &str) -> String {
    format!("/notes/{}", urlencoding::encode(id))
}

/// Map a notes-service status onto the error taxonomy.
fn check(response: &Response, id: Option<&str>) -> NotelyResult<()> {
    match response.status {
        200..=299 => Ok(()),
        401 => Err(NotelyError::SessionExpired),
        404 => match id {
            Some(id) => Err(NotelyError::NotFound { id: id.to_string() }),
            None => Err(transport_status(response)),
        },
        400..=499 => Err(NotelyError::validation("content", response.error_message())),
        _ => Err(transport_status(response)),
    }
}
