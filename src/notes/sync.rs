//! Client view of the note collection.
//!
//! Mutations are issued to the service first. On success the returned note is
//! applied to the local view straight away, then a full `load()` replaces the
//! view with the service's collection. The mutation's own response is only an
//! interim value.
//!
//! Rules the engine keeps:
//! - A failed mutation leaves the view exactly as it was.
//! - A failed reconciling load is logged; the mutation still succeeded and its
//!   local change stays visible.
//! - Every load response replaces the view wholesale. When loads overlap, the
//!   one that completes last is what the view shows.
//! - After [`NotesSync::detach`], responses from calls started earlier are not
//!   applied.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::api::NotesApi;
use super::model::Note;
use crate::error::{NotelyError, NotelyResult};

/// What the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesViewStatus {
    /// Nothing to show and no load has completed since the view was attached.
    Loading,
    /// Loaded, and there are no notes.
    Empty,
    Populated,
}

#[derive(Debug, Default)]
struct SyncState {
    notes: Vec<Note>,
    loaded: bool,
    loads_in_flight: usize,
    /// Bumped on attach and detach; calls tagged with an older value are stale.
    generation: u64,
    attached: bool,
}

/// Keeps the note collection in step with the notes service.
///
/// Clones share one view.
#[derive(Clone)]
pub struct NotesSync {
    api: NotesApi,
    state: Arc<Mutex<SyncState>>,
}

impl NotesSync {
    /// A new engine with an attached, not yet loaded view.
    pub fn new(api: NotesApi) -> Self {
        let state = SyncState {
            attached: true,
            ..SyncState::default()
        };
        Self {
            api,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of the current view.
    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.lock().notes.iter().find(|n| n.id == id).cloned()
    }

    /// A view holding notes is `Populated` even before its first load
    /// completes, e.g. a created note whose reconciling load failed.
    pub fn status(&self) -> NotesViewStatus {
        let state = self.lock();
        if !state.notes.is_empty() {
            NotesViewStatus::Populated
        } else if state.loaded {
            NotesViewStatus::Empty
        } else {
            NotesViewStatus::Loading
        }
    }

    /// True while any load is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.lock().loads_in_flight > 0
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Start a fresh view, discarding whatever was shown before.
    pub fn attach(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.attached = true;
        state.loaded = false;
        state.notes.clear();
        debug!("Notes view attached (generation {})", state.generation);
    }

    /// Stop applying results to the view. Calls already in flight still
    /// complete and report to their callers.
    pub fn detach(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.attached = false;
        state.notes.clear();
        state.loaded = false;
        debug!("Notes view detached");
    }

    /// Fetch the whole collection and replace the view with it.
    pub async fn load(&self) -> NotelyResult<Vec<Note>> {
        let generation = {
            let mut state = self.lock();
            state.loads_in_flight += 1;
            state.generation
        };

        let in_flight = LoadInFlight(self);
        let result = self.api.list().await;
        drop(in_flight);

        let mut state = self.lock();
        match &result {
            Ok(notes) if Self::is_current(&state, generation) => {
                debug!("Loaded {} notes", notes.len());
                state.notes = notes.clone();
                state.loaded = true;
            }
            Ok(_) => debug!("Discarding notes loaded for a detached view"),
            Err(e) => warn!("Failed to load notes: {}", e),
        }
        result
    }

    /// Create a note and append it to the view, then reconcile.
    pub async fn create(&self, content: &str) -> NotelyResult<Note> {
        validate_content(content)?;
        let generation = self.generation();

        let note = self.api.create(content).await?;
        info!("Created note {}", note.id);
        if !self.apply(generation, |notes| notes.push(note.clone())) {
            return Ok(note);
        }

        self.reconcile(generation).await;
        Ok(note)
    }

    /// Replace the content of a note in the view, then reconcile.
    ///
    /// `id` must be in the current view; otherwise nothing is sent.
    pub async fn update(&self, id: &str, content: &str) -> NotelyResult<Note> {
        validate_content(content)?;
        if self.get(id).is_none() {
            return Err(NotelyError::NotFound { id: id.to_string() });
        }
        let generation = self.generation();

        let note = self.api.update(id, content).await?;
        info!("Updated note {}", note.id);
        let applied = self.apply(generation, |notes| {
            if let Some(slot) = notes.iter_mut().find(|n| n.id == note.id) {
                *slot = note.clone();
            }
        });
        if applied {
            self.reconcile(generation).await;
        }
        Ok(note)
    }

    /// Remove a note from the view, then reconcile.
    pub async fn delete(&self, id: &str) -> NotelyResult<()> {
        let generation = self.generation();

        self.api.delete(id).await?;
        info!("Deleted note {}", id);
        if self.apply(generation, |notes| notes.retain(|n| n.id != id)) {
            self.reconcile(generation).await;
        }
        Ok(())
    }

    /// Post-mutation refetch. A failure here is not the mutation's failure.
    async fn reconcile(&self, generation: u64) {
        let current = Self::is_current(&self.lock(), generation);
        if !current {
            return;
        }
        if let Err(e) = self.load().await {
            warn!("Reconciling load failed, keeping local changes: {}", e);
        }
    }

    /// Run `f` on the view if `generation` is still current.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut Vec<Note>)) -> bool {
        let mut state = self.lock();
        if !Self::is_current(&state, generation) {
            debug!("Discarding mutation result for a detached view");
            return false;
        }
        f(&mut state.notes);
        true
    }

    fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn is_current(state: &SyncState, generation: u64) -> bool {
        state.attached && state.generation == generation
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Counts one outstanding load until dropped, whether or not it completes.
struct LoadInFlight<'a>(&'a NotesSync);

impl Drop for LoadInFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
    }
}

fn validate_content(content: &str) -> NotelyResult<()> {
    if content.trim().is_empty() {
        return Err(NotelyError::validation("content", "Note content is required"));
    }
    Ok(())
}
