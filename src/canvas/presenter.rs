//! Presentation target the canvas pushes drawables to.
//!
//! The engine never reads back pixels or geometry; it only tells the
//! presentation layer which objects appear, disappear, or changed.

use bevy::prelude::*;

use super::{ContextId, DrawableHandle, Shape};

pub trait Presenter: Send + Sync {
    fn display_object(&mut self, context: ContextId, handle: &DrawableHandle, shape: &Shape);
    fn destroy_object(&mut self, context: ContextId, handle: &DrawableHandle);
    fn redraw_object(&mut self, context: ContextId, handle: &DrawableHandle, shape: &Shape);
}

/// Presenter that only traces what would be drawn.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn display_object(&mut self, context: ContextId, handle: &DrawableHandle, shape: &Shape) {
        debug!(
            "display {} {} in window {} at ({}, {})",
            shape.kind, handle, context, shape.position.x, shape.position.y
        );
    }

    fn destroy_object(&mut self, context: ContextId, handle: &DrawableHandle) {
        debug!("destroy {} in window {}", handle, context);
    }

    fn redraw_object(&mut self, context: ContextId, handle: &DrawableHandle, shape: &Shape) {
        debug!("redraw {} {} in window {}", shape.kind, handle, context);
    }
}

/// One call received by a [`RecordingPresenter`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    Display(ContextId, DrawableHandle),
    Destroy(ContextId, DrawableHandle),
    Redraw(ContextId, DrawableHandle),
}

/// Presenter that remembers every call, shared with the test through an
/// `Arc` so calls can be inspected after the workspace took ownership.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub calls: std::sync::Arc<std::sync::Mutex<Vec<PresenterCall>>>,
}

#[cfg(test)]
impl RecordingPresenter {
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Presenter for RecordingPresenter {
    fn display_object(&mut self, context: ContextId, handle: &DrawableHandle, _shape: &Shape) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Display(context, handle.clone()));
    }

    fn destroy_object(&mut self, context: ContextId, handle: &DrawableHandle) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Destroy(context, handle.clone()));
    }

    fn redraw_object(&mut self, context: ContextId, handle: &DrawableHandle, _shape: &Shape) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Redraw(context, handle.clone()));
    }
}
