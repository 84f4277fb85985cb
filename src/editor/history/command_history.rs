//! Per-window undo/redo histories and the dispatch path every command takes.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use bevy::prelude::*;

use super::bounded::BoundedHistory;
use super::commands::{DrawCommand, Reversible};
use crate::canvas::{ContextId, WindowEvent, Workspace};
use crate::constants::DEFAULT_UNDO_CAPACITY;
use crate::error::{DrawError, DrawResult};
use crate::report::Reporter;

/// Outcome of running a command through the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Applied,
    /// The user interrupted the command; nothing was recorded
    Interrupted,
}

/// Resource owning one bounded undo history and one unbounded redo history
/// per window.
#[derive(Resource)]
pub struct CommandHistoryManager {
    undo_stacks: HashMap<ContextId, BoundedHistory<DrawCommand>>,
    redo_stacks: HashMap<ContextId, BoundedHistory<DrawCommand>>,
    current: Option<ContextId>,
    /// Capacity given to undo histories created from now on
    default_capacity: NonZeroUsize,
}

impl Default for CommandHistoryManager {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_UNDO_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl CommandHistoryManager {
    pub fn new(default_capacity: NonZeroUsize) -> Self {
        Self {
            undo_stacks: HashMap::new(),
            redo_stacks: HashMap::new(),
            current: None,
            default_capacity,
        }
    }

    /// Change the capacity of histories not yet created. Existing histories
    /// keep theirs; use [`Self::change_capacity`] for those.
    pub fn set_default_capacity(&mut self, capacity: NonZeroUsize) {
        self.default_capacity = capacity;
    }

    pub fn default_capacity(&self) -> NonZeroUsize {
        self.default_capacity
    }

    // ========================================================================
    // Window tracking
    // ========================================================================

    pub fn current_context(&self) -> Option<ContextId> {
        self.current
    }

    pub fn on_context_switch(&mut self, id: ContextId) {
        if self.current != Some(id) {
            debug!("History now tracking window {}", id);
        }
        self.current = Some(id);
    }

    /// Drop the histories of a window that no longer exists.
    pub fn forget_context(&mut self, id: ContextId) {
        self.undo_stacks.remove(&id);
        self.redo_stacks.remove(&id);
        if self.current == Some(id) {
            self.current = None;
        }
        debug!("Forgot history of window {}", id);
    }

    pub fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Created(_) => {}
            WindowEvent::Switched(id) => self.on_context_switch(id),
            WindowEvent::Destroyed(id) => self.forget_context(id),
        }
    }

    /// Consume every window event the workspace raised since the last sync.
    pub fn sync_with(&mut self, workspace: &mut Workspace) {
        for event in workspace.take_events() {
            self.handle_window_event(event);
        }
    }

    fn require_current(&self) -> DrawResult<ContextId> {
        self.current.ok_or(DrawError::NoActiveContext)
    }

    fn undo_stack(&mut self, id: ContextId) -> &mut BoundedHistory<DrawCommand> {
        let capacity = self.default_capacity;
        self.undo_stacks
            .entry(id)
            .or_insert_with(|| BoundedHistory::new(capacity))
    }

    fn redo_stack(&mut self, id: ContextId) -> &mut BoundedHistory<DrawCommand> {
        self.redo_stacks
            .entry(id)
            .or_insert_with(BoundedHistory::unbounded)
    }

    /// Put a command straight onto the current window's redo history.
    #[cfg(test)]
    pub(super) fn push_redo(&mut self, command: DrawCommand) -> DrawResult<()> {
        let id = self.require_current()?;
        self.redo_stack(id).push(command);
        Ok(())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Apply a command without recording it. A keyboard interrupt is reported
    /// and swallowed; every other error propagates.
    pub fn execute(
        &mut self,
        command: &mut DrawCommand,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<Execution> {
        match command.apply(workspace, reporter) {
            Ok(()) => Ok(Execution::Applied),
            Err(DrawError::KeyboardInterrupt) => {
                reporter.report_warning(&format!("{} interrupted", command.description()));
                Ok(Execution::Interrupted)
            }
            Err(error) => Err(error),
        }
    }

    /// Run a command and record it on the current window's undo history.
    /// The redo history is left as it is.
    pub fn register_and_execute(
        &mut self,
        command: DrawCommand,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<Execution> {
        let id = self.require_current()?;
        self.record(id, command, workspace, reporter)
    }

    /// Apply `command` and push it onto `id`'s undo history only if it
    /// completed. Interrupted or failed commands are never left recorded.
    fn record(
        &mut self,
        id: ContextId,
        mut command: DrawCommand,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<Execution> {
        let outcome = self.execute(&mut command, workspace, reporter)?;
        if outcome == Execution::Applied {
            if command.is_undoable() {
                trace!("Recorded '{}' on window {}", command.description(), id);
                self.undo_stack(id).push(command);
            } else {
                trace!("'{}' is not undoable, not recorded", command.description());
            }
        }
        Ok(outcome)
    }

    /// Reverse the `count` most recent commands, newest first. Stops at the
    /// first failure; commands already undone stay undone.
    pub fn undo(
        &mut self,
        count: usize,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<usize> {
        let id = self.require_current()?;
        for done in 0..count {
            let mut command = match self.undo_stack(id).pop() {
                Ok(command) => command,
                Err(error) => {
                    debug!("Undo stopped after {} of {}", done, count);
                    return Err(error);
                }
            };
            if let Err(error) = command.reverse(workspace, reporter) {
                warn!("Failed to undo '{}': {}", command.description(), error);
                self.undo_stack(id).push(command);
                return Err(error);
            }
            info!("Undid '{}'", command.description());
            self.redo_stack(id).push(command);
        }
        Ok(count)
    }

    /// Re-apply the `count` most recently undone commands through the same
    /// path as a fresh command. Asking for more than are available changes
    /// nothing; an interrupted command stays on the redo history and ends the
    /// batch. Returns how many were redone.
    pub fn redo(
        &mut self,
        count: usize,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<usize> {
        let id = self.require_current()?;
        let available = self.redo_depth();
        if count > available {
            return Err(DrawError::InvalidRedoCount {
                requested: count,
                available,
            });
        }

        for done in 0..count {
            let mut command = self.redo_stack(id).pop()?;
            match self.execute(&mut command, workspace, reporter) {
                Ok(Execution::Applied) => {
                    info!("Redid '{}'", command.description());
                    self.undo_stack(id).push(command);
                }
                Ok(Execution::Interrupted) => {
                    debug!("Redo stopped after {} of {}", done, count);
                    self.redo_stack(id).push(command);
                    return Ok(done);
                }
                Err(error) => {
                    warn!("Failed to redo '{}': {}", command.description(), error);
                    self.redo_stack(id).push(command);
                    return Err(error);
                }
            }
        }
        Ok(count)
    }

    /// Resize the current window's undo history, keeping the newest entries.
    pub fn change_capacity(&mut self, capacity: usize) -> DrawResult<()> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            DrawError::InvalidArgument("undo capacity must be at least 1".to_string())
        })?;
        let id = self.require_current()?;
        let default_capacity = self.default_capacity;
        let history = self
            .undo_stacks
            .remove(&id)
            .unwrap_or_else(|| BoundedHistory::new(default_capacity));
        let dropped = history.len().saturating_sub(capacity.get());
        self.undo_stacks.insert(id, history.resized(capacity));
        info!(
            "Undo capacity of window {} set to {} ({} oldest dropped)",
            id, capacity, dropped
        );
        Ok(())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn undo_depth(&self) -> usize {
        self.current
            .and_then(|id| self.undo_stacks.get(&id))
            .map_or(0, BoundedHistory::len)
    }

    pub fn redo_depth(&self) -> usize {
        self.current
            .and_then(|id| self.redo_stacks.get(&id))
            .map_or(0, BoundedHistory::len)
    }

    /// Capacity of the current window's undo history.
    pub fn undo_capacity(&self) -> NonZeroUsize {
        self.current
            .and_then(|id| self.undo_stacks.get(&id))
            .map_or(self.default_capacity, BoundedHistory::capacity)
    }

    /// Descriptions of the next commands `undo` would reverse, newest first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        Self::describe(self.current.and_then(|id| self.undo_stacks.get(&id)), limit)
    }

    /// Descriptions of the next commands `redo` would re-apply, newest first.
    pub fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        Self::describe(self.current.and_then(|id| self.redo_stacks.get(&id)), limit)
    }

    fn describe(history: Option<&BoundedHistory<DrawCommand>>, limit: usize) -> Vec<String> {
        history
            .map(|history| {
                history
                    .iter()
                    .rev()
                    .take(limit)
                    .map(|command| command.description())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Empty both histories of the current window.
    pub fn clear(&mut self) -> DrawResult<()> {
        let id = self.require_current()?;
        self.undo_stack(id).clear();
        self.redo_stack(id).clear();
        Ok(())
    }
}
