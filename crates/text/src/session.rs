//! Interactive redaction session: a token stream plus its history.

use serde::{Deserialize, Serialize};

use crate::history::{RedactionAction, UndoRedoStack, DEFAULT_HISTORY_DEPTH};
use crate::redaction::render_tokens;
use crate::tokenize::{tokenize_with_auto_detection, Token};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("token {index} out of range ({len} tokens)")]
    TokenOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub history_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Owns the tokens of one text and records every toggle.
#[derive(Debug, Clone)]
pub struct RedactionSession {
    tokens: Vec<Token>,
    history: UndoRedoStack,
}

impl RedactionSession {
    /// Tokenize `text` with auto-detection and start an empty history.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &SessionConfig::default())
    }

    pub fn with_config(text: &str, config: &SessionConfig) -> Self {
        Self::from_tokens(tokenize_with_auto_detection(text), config)
    }

    pub fn from_tokens(tokens: Vec<Token>, config: &SessionConfig) -> Self {
        log::info!("[Session] started with {} tokens", tokens.len());
        Self {
            tokens,
            history: UndoRedoStack::with_capacity(config.history_depth),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Flip one token and record the change.
    pub fn toggle(&mut self, index: usize) -> Result<RedactionAction, SessionError> {
        let len = self.tokens.len();
        let token = self
            .tokens
            .get_mut(index)
            .ok_or(SessionError::TokenOutOfRange { index, len })?;

        // Positions, not `Token::index`: tokens passed to `from_tokens` may be
        // numbered differently.
        let action = RedactionAction {
            token_index: index as u32,
            old_redacted: token.is_redacted,
            new_redacted: !token.is_redacted,
        };
        token.is_redacted = action.new_redacted;
        self.history.record(action);
        log::debug!("[Session] token {} redacted={}", index, action.new_redacted);
        Ok(action)
    }

    /// Revert the latest toggle, if any.
    pub fn undo(&mut self) -> Option<RedactionAction> {
        let action = self.history.undo()?;
        self.set_redacted(action.token_index, action.old_redacted);
        Some(action)
    }

    /// Re-apply the latest undone toggle, if any.
    pub fn redo(&mut self) -> Option<RedactionAction> {
        let action = self.history.redo()?;
        self.set_redacted(action.token_index, action.new_redacted);
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn render(&self) -> String {
        render_tokens(&self.tokens)
    }

    pub fn redacted_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_redacted).count()
    }

    fn set_redacted(&mut self, index: u32, redacted: bool) {
        match self.tokens.get_mut(index as usize) {
            Some(token) => token.is_redacted = redacted,
            None => log::warn!("[Session] history refers to missing token {}", index),
        }
    }
}
