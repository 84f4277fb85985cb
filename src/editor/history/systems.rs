//! Bevy systems connecting the history manager to config and windows.

use std::num::NonZeroUsize;

use bevy::prelude::*;

use super::command_history::CommandHistoryManager;
use crate::canvas::Workspace;
use crate::config::AppConfig;

/// Startup system applying the configured undo capacity to new histories
pub fn apply_configured_capacity(
    config: Res<AppConfig>,
    mut history: ResMut<CommandHistoryManager>,
) {
    match NonZeroUsize::new(config.data.undo_capacity) {
        Some(capacity) => {
            history.set_default_capacity(capacity);
            info!("Undo capacity: {}", capacity);
        }
        None => warn!(
            "Ignoring undo_capacity 0 in config, keeping {}",
            history.default_capacity()
        ),
    }
}

/// Keep the manager's current window in step with the workspace
pub fn track_window_events(
    mut workspace: ResMut<Workspace>,
    mut history: ResMut<CommandHistoryManager>,
) {
    history.sync_with(&mut workspace);
}
