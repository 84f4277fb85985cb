//! State machine behind the interactive `edit` command.
//!
//! The prompt waits for one kind of input at a time (handle, then attribute
//! name, then value). Each console line resumes it exactly once through
//! [`EditPrompt::resume`]; an interrupt resumes it with
//! [`PromptInput::Interrupted`] instead of a value and ends the sequence.

use bevy::prelude::*;

use super::commands::EditAttribute;
use crate::canvas::{Attribute, ContextId, DrawableHandle, ShapeKind};
use crate::error::{DrawError, DrawResult};

/// What the prompt is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Handle,
    Attribute,
    Value,
}

impl InputKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputKind::Handle => "object to edit",
            InputKind::Attribute => "attribute",
            InputKind::Value => "new value",
        }
    }
}

/// One resumption of the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Value(String),
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptState {
    Awaiting(InputKind),
    Complete,
    Cancelled,
    /// An answer was rejected; no edit will be produced
    Failed(DrawError),
}

#[derive(Debug, Clone)]
pub struct EditPrompt {
    state: PromptState,
    handle: Option<DrawableHandle>,
    attribute: Option<String>,
    value: Option<String>,
}

impl Default for EditPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl EditPrompt {
    pub fn new() -> Self {
        Self {
            state: PromptState::Awaiting(InputKind::Handle),
            handle: None,
            attribute: None,
            value: None,
        }
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    pub fn awaiting(&self) -> Option<InputKind> {
        match self.state {
            PromptState::Awaiting(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.awaiting().is_none()
    }

    /// Feed the awaited input. Blank values leave the prompt waiting for the
    /// same input kind.
    pub fn resume(&mut self, input: PromptInput) -> &PromptState {
        let Some(kind) = self.awaiting() else {
            warn!("edit prompt resumed after it finished ({:?})", self.state);
            return &self.state;
        };

        let raw = match input {
            PromptInput::Interrupted => {
                debug!("edit prompt interrupted while waiting for {:?}", kind);
                self.state = PromptState::Cancelled;
                return &self.state;
            }
            PromptInput::Value(raw) => raw.trim().to_string(),
        };
        if raw.is_empty() {
            return &self.state;
        }

        self.state = match kind {
            InputKind::Handle => {
                self.handle = Some(DrawableHandle::new(raw));
                PromptState::Awaiting(InputKind::Attribute)
            }
            InputKind::Attribute => {
                let known = ShapeKind::all()
                    .iter()
                    .any(|shape_kind| Attribute::parse(&raw, *shape_kind).is_ok());
                if known {
                    self.attribute = Some(raw);
                    PromptState::Awaiting(InputKind::Value)
                } else {
                    PromptState::Failed(DrawError::UnknownAttribute {
                        attribute: raw,
                        kind: "any shape".to_string(),
                    })
                }
            }
            InputKind::Value => {
                self.value = Some(raw);
                PromptState::Complete
            }
        };
        &self.state
    }

    /// Build the edit described by a completed prompt.
    pub fn build(&self, context: ContextId) -> DrawResult<EditAttribute> {
        match (&self.state, &self.handle, &self.attribute, &self.value) {
            (PromptState::Complete, Some(handle), Some(attribute), Some(value)) => Ok(
                EditAttribute::new(context, handle.clone(), attribute.clone(), value.clone()),
            ),
            _ => Err(DrawError::InvalidUse(
                "the edit prompt has not been completed".to_string(),
            )),
        }
    }
}
