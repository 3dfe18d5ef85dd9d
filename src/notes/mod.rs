//! Notes: the wire type, the service client and the synchronized view.

pub mod api;
pub mod model;
pub mod sync;

pub use api::NotesApi;
pub use model::Note;
pub use sync::{NotesSync, NotesViewStatus};
