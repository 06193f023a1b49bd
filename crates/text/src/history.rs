//! Bounded undo/redo history for token toggles.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_DEPTH: usize = 10;

/// One toggle of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionAction {
    pub token_index: u32,
    pub old_redacted: bool,
    pub new_redacted: bool,
}

impl RedactionAction {
    /// The action that reverts this one.
    pub fn inverse(&self) -> Self {
        Self {
            token_index: self.token_index,
            old_redacted: self.new_redacted,
            new_redacted: self.old_redacted,
        }
    }
}

/// Two bounded stacks; the oldest entry is evicted from the front.
#[derive(Debug, Clone)]
pub struct UndoRedoStack {
    undo: VecDeque<RedactionAction>,
    redo: VecDeque<RedactionAction>,
    capacity: usize,
}

impl Default for UndoRedoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoRedoStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_DEPTH)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a new action and drop everything that could be redone.
    pub fn record(&mut self, action: RedactionAction) {
        push_bounded(&mut self.undo, action, self.capacity);
        self.redo.clear();
    }

    /// Move the latest action to the redo stack and return it.
    ///
    /// The caller applies `action.old_redacted` to the token.
    pub fn undo(&mut self) -> Option<RedactionAction> {
        let action = self.undo.pop_back()?;
        push_bounded(&mut self.redo, action, self.capacity);
        Some(action)
    }

    /// Mirror of [`undo`](Self::undo); the caller applies `action.new_redacted`.
    pub fn redo(&mut self) -> Option<RedactionAction> {
        let action = self.redo.pop_back()?;
        push_bounded(&mut self.undo, action, self.capacity);
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<RedactionAction>, action: RedactionAction, capacity: usize) {
    if stack.len() == capacity {
        stack.pop_front();
    }
    stack.push_back(action);
}
