//! Undo/Redo system for drawing commands.
//!
//! Every reversible console command (create, edit, layer changes, moves,
//! deletes) is recorded as a command on the undo history of the window it
//! was issued in. Each window keeps its own histories; switching windows
//! switches histories.
//!
//! ## Usage
//!
//! - **undo [n]**: Reverse the last `n` commands (default 1)
//! - **redo [n]**: Re-apply the last `n` undone commands (default 1)
//! - **capacity n**: Resize the current window's undo history
//!
//! ## Module Structure
//!
//! - [`bounded`] - Fixed-capacity history that evicts its oldest entry
//! - [`commands`] - Command structs, the `Reversible` trait and `DrawCommand`
//! - [`data_types`] - State captured for reversal
//! - [`execute`] - Apply/reverse implementations
//! - [`prompt`] - Interactive edit prompt state machine
//! - [`command_history`] - CommandHistoryManager resource
//! - [`systems`] - Bevy systems wiring the manager to config and windows

mod bounded;
mod command_history;
mod commands;
mod data_types;
mod execute;
mod prompt;
mod systems;

#[cfg(test)]
mod tests;

// Re-exports
pub use command_history::{CommandHistoryManager, Execution};
pub use commands::{
    CreateShape, DrawCommand, EditAttribute, InteractiveEdit, LayerChange, LayerDirection,
    MoveShape, Redraw, RemoveShape, Reversible, SetLayer,
};
pub use prompt::PromptInput;

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub struct HistoryPlugin;

impl Plugin for HistoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandHistoryManager>()
            .add_systems(
                Startup,
                systems::apply_configured_capacity.after(ConfigLoaded),
            )
            .add_systems(Update, systems::track_window_events);
    }
}
