//! Console session: dispatches each input line against the workspace and
//! the history manager.

use bevy::prelude::*;

use super::parser::{parse_line, ConsoleAction, CommandRegistry, HELP};
use crate::canvas::{ContextId, DrawableHandle, Workspace};
use crate::constants::MAX_HISTORY_LISTING;
use crate::editor::history::{
    CommandHistoryManager, DrawCommand, Execution, InteractiveEdit, PromptInput, Reversible,
};
use crate::error::{DrawError, DrawResult};
use crate::report::Reporter;

/// What the caller should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// New windows should use this undo capacity from now on; persist it
    DefaultCapacity(usize),
}

#[derive(Resource)]
pub struct Console {
    registry: CommandRegistry,
    /// Interactive edit waiting for more input
    pending: Option<InteractiveEdit>,
    /// Whether the prompt has to be printed again
    needs_prompt: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(CommandRegistry::default())
    }
}

impl Console {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            pending: None,
            needs_prompt: true,
        }
    }

    #[allow(dead_code)]
    pub fn is_prompting(&self) -> bool {
        self.pending.is_some()
    }

    /// Prompt to print: the awaited input of a pending edit, or `default`.
    pub fn prompt_text(&self, default: &str) -> String {
        match self.pending.as_ref().and_then(|edit| edit.prompt.awaiting()) {
            Some(kind) => format!("{}: ", kind.prompt()),
            None => default.to_string(),
        }
    }

    /// Returns true once per handled line.
    pub fn take_needs_prompt(&mut self) -> bool {
        std::mem::take(&mut self.needs_prompt)
    }

    /// Handle one input line. Errors are reported, never returned.
    pub fn handle_line(
        &mut self,
        line: &str,
        workspace: &mut Workspace,
        history: &mut CommandHistoryManager,
        reporter: &mut dyn Reporter,
    ) -> Flow {
        self.needs_prompt = true;
        history.sync_with(workspace);

        let result = if self.pending.is_some() {
            self.answer_prompt(line, workspace, history, reporter)
                .map(|_| Flow::Continue)
        } else {
            parse_line(line)
                .and_then(|action| self.dispatch(action, workspace, history, reporter))
        };

        history.sync_with(workspace);
        result.unwrap_or_else(|error| {
            reporter.report_error(&error.to_string());
            Flow::Continue
        })
    }

    /// Resume the pending interactive edit; run it once the prompt is done.
    fn answer_prompt(
        &mut self,
        line: &str,
        workspace: &mut Workspace,
        history: &mut CommandHistoryManager,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        let Some(mut edit) = self.pending.take() else {
            return Ok(());
        };
        let input = if line.trim() == "cancel" {
            PromptInput::Interrupted
        } else {
            PromptInput::Value(line.to_string())
        };

        edit.prompt.resume(input);
        if !edit.prompt.is_finished() {
            self.pending = Some(edit);
            return Ok(());
        }
        self.run(DrawCommand::Interactive(edit), workspace, history, reporter)
    }

    fn run(
        &mut self,
        command: DrawCommand,
        workspace: &mut Workspace,
        history: &mut CommandHistoryManager,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        let description = command.description();
        match history.register_and_execute(command, workspace, reporter)? {
            Execution::Applied => debug!("Console ran '{}'", description),
            Execution::Interrupted => debug!("Console command '{}' interrupted", description),
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        action: ConsoleAction,
        workspace: &mut Workspace,
        history: &mut CommandHistoryManager,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<Flow> {
        match action {
            ConsoleAction::Empty => {}
            ConsoleAction::Draw { name, args } => {
                let context = workspace.require_current()?;
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                let command = self.registry.build(&name, &args, context)?;
                self.run(command, workspace, history, reporter)?;
            }
            ConsoleAction::Edit => {
                let context = workspace.require_current()?;
                self.pending = Some(InteractiveEdit::new(context));
            }
            ConsoleAction::Undo(count) => undo(count, workspace, history, reporter)?,
            ConsoleAction::Redo(count) => {
                history.redo(count, workspace, reporter)?;
            }
            ConsoleAction::Capacity(capacity) => {
                history.change_capacity(capacity)?;
                reporter.report_info(&format!("undo capacity is now {}", capacity));
            }
            ConsoleAction::DefaultCapacity(capacity) => {
                let capacity = std::num::NonZeroUsize::new(capacity).ok_or_else(|| {
                    DrawError::InvalidArgument("undo capacity must be at least 1".to_string())
                })?;
                history.set_default_capacity(capacity);
                reporter.report_info(&format!("new windows get an undo capacity of {}", capacity));
                return Ok(Flow::DefaultCapacity(capacity.get()));
            }
            ConsoleAction::History => show_history(history, reporter)?,
            ConsoleAction::WindowNew(title) => {
                let id = workspace.create_context(title);
                reporter.report_info(&format!("opened window {}", id));
            }
            ConsoleAction::WindowSwitch(id) => workspace.switch_to(id)?,
            ConsoleAction::WindowClose(id) => {
                let id = match id {
                    Some(id) => id,
                    None => workspace.require_current()?,
                };
                workspace.destroy_context(id)?;
                reporter.report_info(&format!("closed window {}", id));
            }
            ConsoleAction::WindowList => list_windows(workspace, reporter),
            ConsoleAction::List => list_objects(workspace.require_current()?, workspace, reporter)?,
            ConsoleAction::Show(handle) => show_object(&handle, workspace, reporter)?,
            ConsoleAction::Help => {
                let mut help = HELP.to_string();
                let extra: Vec<_> = self
                    .registry
                    .names()
                    .filter(|name| !HELP.contains(name))
                    .collect();
                if !extra.is_empty() {
                    help.push_str(&format!("\nAlso: {}", extra.join(", ")));
                }
                reporter.report_info(&help);
            }
            ConsoleAction::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

fn undo(
    count: usize,
    workspace: &mut Workspace,
    history: &mut CommandHistoryManager,
    reporter: &mut dyn Reporter,
) -> DrawResult<()> {
    let available = history.undo_depth();
    match history.undo(count, workspace, reporter) {
        Ok(_) => Ok(()),
        Err(DrawError::Underflow) if count > 1 => {
            reporter.report_error(&format!(
                "{} (undid {} of {})",
                DrawError::Underflow,
                available,
                count
            ));
            Ok(())
        }
        Err(error) => Err(error),
    }
}

fn show_history(history: &CommandHistoryManager, reporter: &mut dyn Reporter) -> DrawResult<()> {
    let id = history.current_context().ok_or(DrawError::NoActiveContext)?;
    let mut lines = vec![format!(
        "window {}: {} of {} undo slots used, {} to redo",
        id,
        history.undo_depth(),
        history.undo_capacity(),
        history.redo_depth()
    )];
    for description in history.undo_descriptions(MAX_HISTORY_LISTING) {
        lines.push(format!("  undo: {}", description));
    }
    for description in history.redo_descriptions(MAX_HISTORY_LISTING) {
        lines.push(format!("  redo: {}", description));
    }
    reporter.report_info(&lines.join("\n"));
    Ok(())
}

fn list_windows(workspace: &Workspace, reporter: &mut dyn Reporter) {
    let current = workspace.current_id();
    let lines: Vec<String> = workspace
        .contexts()
        .map(|context| {
            let marker = if Some(context.id()) == current { "*" } else { " " };
            format!(
                "{} {} \"{}\" ({} objects)",
                marker,
                context.id(),
                context.title(),
                context.surface().len()
            )
        })
        .collect();
    if lines.is_empty() {
        reporter.report_info("no windows open");
    } else {
        reporter.report_info(&lines.join("\n"));
    }
}

/// Objects of a window, front to back.
fn list_objects(
    id: ContextId,
    workspace: &Workspace,
    reporter: &mut dyn Reporter,
) -> DrawResult<()> {
    let context = workspace.context(id)?;
    let order = context.surface().render_order();
    if order.is_empty() {
        reporter.report_info(&format!("window {} is empty", id));
        return Ok(());
    }
    let mut lines = Vec::with_capacity(order.len());
    for (rank, handle) in order.iter().enumerate().rev() {
        let shape = context.shape(handle)?;
        lines.push(format!("  [{}] {} ({})", rank, handle, shape.kind));
    }
    reporter.report_info(&lines.join("\n"));
    Ok(())
}

fn show_object(
    handle: &DrawableHandle,
    workspace: &Workspace,
    reporter: &mut dyn Reporter,
) -> DrawResult<()> {
    let context = workspace.context(workspace.require_current()?)?;
    let shape = context.shape(handle)?;
    let rank = context.surface().rank_of(handle)?;

    let mut lines = vec![format!("{} ({}), layer {}", handle, shape.kind, rank)];
    for (name, value) in shape.describe() {
        lines.push(format!("  {}: {}", name, value));
    }
    reporter.report_info(&lines.join("\n"));
    Ok(())
}
