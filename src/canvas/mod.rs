//! Windows, drawables, and their layer order.
//!
//! ## Module Structure
//!
//! - [`handle`] - Drawable handles and window ids
//! - [`shape`] - Shape state and named attributes
//! - [`surface`] - Per-window front-to-back ordering
//! - [`presenter`] - Interface to the presentation layer
//! - [`workspace`] - Window subsystem resource

mod handle;
pub mod presenter;
mod shape;
mod surface;
mod workspace;

#[cfg(test)]
mod tests;

pub use handle::{ContextId, DrawableHandle};
pub use shape::{Attribute, AttributeValue, Shape, ShapeKind};
pub use surface::{OrderedSurface, Placement};
pub use workspace::{WindowEvent, Workspace};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};

/// Startup system opening the first window when the config asks for one
fn open_initial_window(config: Res<AppConfig>, mut workspace: ResMut<Workspace>) {
    if config.data.open_initial_window && workspace.current_id().is_none() {
        workspace.create_context(None);
    }
}

pub struct CanvasPlugin;

impl Plugin for CanvasPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Workspace>()
            .add_systems(Startup, open_initial_window.after(ConfigLoaded));
    }
}
