//! Error handling for the notely client.
//!
//! | Variant | Raised when | Caller reaction |
//! |---------|-------------|-----------------|
//! | `Validation` | malformed email, empty content, out-of-order OTP step | stay on form, no call issued |
//! | `Delivery` | the code could not be sent | show message, allow resend |
//! | `Verification` | wrong or expired code | show message, allow resubmit or resend |
//! | `Transport` | network failure, 5xx | show message, allow retry |
//! | `NotFound` | mutation target already gone | show message, list is refetched on next load |
//! | `SessionExpired` | token no longer accepted | redirect to sign-in |

mod category;
mod notely_error;
mod result;

pub use category::ErrorCategory;
pub use notely_error::NotelyError;
pub use result::NotelyResult;
