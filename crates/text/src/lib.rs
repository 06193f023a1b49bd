//! Tokenization and redaction of plain text.
//!
//! Bulk redaction replaces detections with fixed tags; the token API lets a
//! caller flip individual tokens and undo those flips.

pub mod history;
pub mod redaction;
pub mod session;
pub mod tokenize;

pub use history::{RedactionAction, UndoRedoStack, DEFAULT_HISTORY_DEPTH};
pub use redaction::{redact, render_tokens, toggle_token, token_replacement};
pub use session::{RedactionSession, SessionConfig, SessionError};
pub use tokenize::{tokenize, tokenize_with_auto_detection, Token};
