//! Result type alias for notely operations.

use super::notely_error::NotelyError;

/// Type alias for Results using NotelyError.
pub type NotelyResult<T> = Result<T, NotelyError>;
