//! Error taxonomy shared by the canvas, history, and console modules.

use thiserror::Error;

use crate::canvas::{ContextId, DrawableHandle};

/// Which end of the render order an object is already pinned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Back,
    Front,
}

impl std::fmt::Display for Extreme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extreme::Back => write!(f, "back"),
            Extreme::Front => write!(f, "front"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Undo/redo history is empty.
    #[error("nothing to undo")]
    Underflow,
    #[error("cannot redo {requested} action(s), only {available} available")]
    InvalidRedoCount { requested: usize, available: usize },
    #[error("no object named '{0}'")]
    HandleNotFound(DrawableHandle),
    #[error("'{handle}' is already at the {extreme}")]
    AlreadyAtExtreme {
        handle: DrawableHandle,
        extreme: Extreme,
    },
    /// Reordering needs at least two objects on the surface.
    #[error("layer changes need at least two objects on the canvas")]
    NotApplicable,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid use: {0}")]
    InvalidUse(String),
    #[error("unknown attribute '{attribute}' for {kind}")]
    UnknownAttribute { attribute: String, kind: String },
    #[error("invalid value '{value}' for {attribute}: expected {expected}")]
    InvalidValueFormat {
        attribute: String,
        value: String,
        expected: &'static str,
    },
    /// Cooperative cancellation of an interactive command.
    #[error("interrupted")]
    KeyboardInterrupt,
    #[error("no window {0}")]
    ContextNotFound(ContextId),
    #[error("no active window")]
    NoActiveContext,
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
}

pub type DrawResult<T> = Result<T, DrawError>;
