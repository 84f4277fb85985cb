//! Unit tests for the history module.

use std::num::NonZeroUsize;

use bevy::prelude::*;

use super::bounded::BoundedHistory;
use super::command_history::{CommandHistoryManager, Execution};
use super::commands::{
    CreateShape, DrawCommand, EditAttribute, InteractiveEdit, LayerChange, LayerDirection,
    MoveShape, Redraw, RemoveShape, Reversible, SetLayer,
};
use super::prompt::{EditPrompt, InputKind, PromptInput, PromptState};
use super::HistoryPlugin;
use crate::canvas::{
    Attribute, AttributeValue, CanvasPlugin, ContextId, DrawableHandle, ShapeKind, Workspace,
};
use crate::config::{AppConfig, AppConfigData};
use crate::error::DrawError;
use crate::report::ReportLog;

struct Harness {
    workspace: Workspace,
    history: CommandHistoryManager,
    reports: ReportLog,
    window: ContextId,
}

impl Harness {
    fn new() -> Self {
        let mut workspace = Workspace::default();
        let mut history = CommandHistoryManager::default();
        let window = workspace.create_context(None);
        history.sync_with(&mut workspace);
        Self {
            workspace,
            history,
            reports: ReportLog::default(),
            window,
        }
    }

    fn run(&mut self, command: impl Into<DrawCommand>) -> Result<Execution, DrawError> {
        self.history
            .register_and_execute(command.into(), &mut self.workspace, &mut self.reports)
    }

    fn create(&mut self, name: &str) {
        let command = CreateShape::new(self.window, ShapeKind::Rectangle).named(name);
        assert_eq!(self.run(command), Ok(Execution::Applied));
    }

    fn undo(&mut self, count: usize) -> Result<usize, DrawError> {
        self.history
            .undo(count, &mut self.workspace, &mut self.reports)
    }

    fn redo(&mut self, count: usize) -> Result<usize, DrawError> {
        self.history
            .redo(count, &mut self.workspace, &mut self.reports)
    }

    fn exists(&self, name: &str) -> bool {
        self.workspace.is_handle_taken(&DrawableHandle::from(name))
    }

    fn rank(&self, name: &str) -> usize {
        self.workspace
            .context(self.window)
            .unwrap()
            .surface()
            .rank_of(&DrawableHandle::from(name))
            .unwrap()
    }

    /// `(handle, rank)` for every shape, by position.
    fn layout(&self) -> Vec<(String, usize)> {
        let surface = self.workspace.context(self.window).unwrap().surface();
        surface
            .members()
            .iter()
            .map(|handle| handle.to_string())
            .zip(surface.ranks().iter().copied())
            .collect()
    }

    fn value(&self, name: &str, attribute: Attribute) -> AttributeValue {
        self.workspace
            .context(self.window)
            .unwrap()
            .shape(&DrawableHandle::from(name))
            .unwrap()
            .get(attribute)
    }
}

fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

// ============================================================================
// BoundedHistory
// ============================================================================

#[test]
fn test_bounded_history_keeps_most_recent() {
    let mut history = BoundedHistory::new(capacity(3));
    for i in 0..10 {
        history.push(i);
        assert!(history.len() <= 3);
    }

    assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    assert_eq!(history.peek(), Ok(&9));
    assert_eq!(history.get(0), Some(&7));
}

#[test]
fn test_bounded_history_underflow() {
    let mut history: BoundedHistory<u8> = BoundedHistory::new(capacity(2));
    assert_eq!(history.pop(), Err(DrawError::Underflow));
    assert_eq!(history.peek(), Err(DrawError::Underflow));
}

#[test]
fn test_bounded_history_pop_is_newest_first() {
    let mut history = BoundedHistory::new(capacity(5));
    history.push("a");
    history.push("b");
    assert_eq!(history.pop(), Ok("b"));
    assert_eq!(history.pop(), Ok("a"));
    assert!(history.is_empty());
}

#[test]
fn test_bounded_history_resize_drops_oldest() {
    let mut history = BoundedHistory::new(capacity(15));
    for i in 0..5 {
        history.push(i);
    }

    let shrunk = history.resized(capacity(2));
    assert_eq!(shrunk.iter().copied().collect::<Vec<_>>(), vec![3, 4]);

    let grown = shrunk.resized(capacity(15));
    assert_eq!(grown.len(), 2);
    assert_eq!(grown.capacity(), capacity(15));
}

// ============================================================================
// Manager
// ============================================================================

#[test]
fn test_undo_two_then_redo_one() {
    let mut h = Harness::new();
    h.create("x");
    h.create("y");
    h.create("z");

    assert_eq!(h.undo(2), Ok(2));
    assert!(h.exists("x"));
    assert!(!h.exists("y"));
    assert!(!h.exists("z"));
    assert_eq!(h.history.undo_depth(), 1);
    // Newest first: y was undone last
    assert_eq!(
        h.history.redo_descriptions(10),
        vec!["create rectangle y", "create rectangle z"]
    );

    assert_eq!(h.redo(1), Ok(1));
    assert!(h.exists("y"));
    assert!(!h.exists("z"));
    assert_eq!(h.history.undo_depth(), 2);
    assert_eq!(h.history.redo_depth(), 1);
    assert_eq!(h.history.undo_descriptions(1), vec!["create rectangle y"]);
}

#[test]
fn test_windows_have_separate_histories() {
    let mut h = Harness::new();
    h.create("x");

    let other = h.workspace.create_context(Some("B".to_string()));
    h.history.sync_with(&mut h.workspace);
    assert_eq!(h.history.current_context(), Some(other));
    assert_eq!(h.undo(1), Err(DrawError::Underflow));

    h.workspace.switch_to(h.window).unwrap();
    h.history.sync_with(&mut h.workspace);
    assert_eq!(h.history.undo_depth(), 1);
}

#[test]
fn test_redo_beyond_depth_changes_nothing() {
    let mut h = Harness::new();
    h.create("x");
    h.create("y");
    h.undo(1).unwrap();

    assert_eq!(
        h.redo(2),
        Err(DrawError::InvalidRedoCount {
            requested: 2,
            available: 1
        })
    );
    assert_eq!(h.history.redo_depth(), 1);
    assert_eq!(h.history.undo_depth(), 1);
    assert!(!h.exists("y"));
}

#[test]
fn test_undo_stops_at_empty_history() {
    let mut h = Harness::new();
    h.create("x");

    assert_eq!(h.undo(3), Err(DrawError::Underflow));
    assert!(!h.exists("x"));
    assert_eq!(h.history.redo_depth(), 1);
}

#[test]
fn test_capacity_shrink_does_not_resurrect() {
    let mut h = Harness::new();
    for name in ["a", "b", "c", "d", "e"] {
        h.create(name);
    }
    assert_eq!(h.history.undo_capacity(), capacity(15));

    h.history.change_capacity(2).unwrap();
    assert_eq!(h.history.undo_depth(), 2);
    h.history.change_capacity(15).unwrap();
    assert_eq!(h.history.undo_depth(), 2);
    assert_eq!(
        h.history.undo_descriptions(10),
        vec!["create rectangle e", "create rectangle d"]
    );
}

#[test]
fn test_zero_capacity_rejected() {
    let mut h = Harness::new();
    assert!(matches!(
        h.history.change_capacity(0),
        Err(DrawError::InvalidArgument(_))
    ));
}

#[test]
fn test_capacity_evicts_oldest() {
    let mut h = Harness::new();
    h.history.change_capacity(2).unwrap();
    h.create("a");
    h.create("b");
    h.create("c");

    assert_eq!(h.undo(3), Err(DrawError::Underflow));
    // "a" fell off the history, so it is still there
    assert!(h.exists("a"));
    assert!(!h.exists("b"));
}

#[test]
fn test_new_command_keeps_redo() {
    let mut h = Harness::new();
    h.create("x");
    h.create("y");
    h.undo(1).unwrap();
    assert_eq!(h.history.redo_depth(), 1);

    h.create("w");
    assert_eq!(h.history.redo_depth(), 1);

    assert_eq!(h.redo(1), Ok(1));
    assert!(h.exists("y"));
    assert_eq!(h.history.redo_depth(), 0);
    assert_eq!(
        h.history.undo_descriptions(10),
        vec!["create rectangle y", "create rectangle w", "create rectangle x"]
    );
}

#[test]
fn test_interrupted_redo_stays_on_redo() {
    let mut h = Harness::new();
    h.create("x");

    let mut edit = InteractiveEdit::new(h.window);
    edit.prompt.resume(PromptInput::Interrupted);
    h.history.push_redo(edit.into()).unwrap();

    assert_eq!(h.redo(1), Ok(0));
    assert_eq!(h.history.redo_depth(), 1);
    assert_eq!(h.history.undo_depth(), 1);
    let warnings: Vec<_> = h.reports.warnings().collect();
    assert_eq!(warnings, vec!["interactive edit interrupted"]);
}

#[test]
fn test_redraw_is_not_recorded() {
    let mut h = Harness::new();
    h.create("x");
    h.create("y");
    h.undo(1).unwrap();

    let redraw = Redraw {
        context: h.window,
        handle: DrawableHandle::from("x"),
    };
    assert_eq!(h.run(redraw), Ok(Execution::Applied));
    assert_eq!(h.history.undo_depth(), 1);
    assert_eq!(h.history.redo_depth(), 1);
}

#[test]
fn test_failed_command_is_not_recorded() {
    let mut h = Harness::new();
    h.create("x");

    let result = h.run(RemoveShape::new(h.window, DrawableHandle::from("ghost")));
    assert_eq!(result, Err(DrawError::HandleNotFound(DrawableHandle::from("ghost"))));
    assert_eq!(h.history.undo_depth(), 1);
}

#[test]
fn test_failed_undo_keeps_command() {
    let mut h = Harness::new();
    h.create("x");
    // Remove it behind the history's back
    h.workspace
        .destroy(h.window, &DrawableHandle::from("x"))
        .unwrap();

    assert!(matches!(h.undo(1), Err(DrawError::HandleNotFound(_))));
    assert_eq!(h.history.undo_depth(), 1);
    assert_eq!(h.history.redo_depth(), 0);
}

#[test]
fn test_no_active_window() {
    let mut workspace = Workspace::default();
    let mut history = CommandHistoryManager::default();
    let mut reports = ReportLog::default();

    let command = CreateShape::new(ContextId(1), ShapeKind::Ellipse);
    assert_eq!(
        history.register_and_execute(command.into(), &mut workspace, &mut reports),
        Err(DrawError::NoActiveContext)
    );
    assert_eq!(
        history.undo(1, &mut workspace, &mut reports),
        Err(DrawError::NoActiveContext)
    );
}

#[test]
fn test_closed_window_history_is_forgotten() {
    let mut h = Harness::new();
    h.create("x");
    let window = h.window;

    h.workspace.destroy_context(window).unwrap();
    h.history.sync_with(&mut h.workspace);
    assert_eq!(h.history.current_context(), None);

    let reopened = h.workspace.create_context(None);
    h.history.sync_with(&mut h.workspace);
    assert_eq!(h.history.current_context(), Some(reopened));
    assert_eq!(h.history.undo_depth(), 0);
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_reverse_before_apply_is_invalid_use() {
    let mut workspace = Workspace::default();
    let mut reports = ReportLog::default();
    let window = workspace.create_context(None);

    let mut create = CreateShape::new(window, ShapeKind::Line);
    assert!(matches!(
        create.reverse(&mut workspace, &mut reports),
        Err(DrawError::InvalidUse(_))
    ));

    let mut remove = RemoveShape::new(window, DrawableHandle::from("x"));
    assert!(matches!(
        remove.reverse(&mut workspace, &mut reports),
        Err(DrawError::InvalidUse(_))
    ));
}

#[test]
fn test_create_generates_handle_and_redo_reuses_it() {
    let mut h = Harness::new();
    let command = CreateShape::new(h.window, ShapeKind::Polygon).with_attribute("sides", "5");
    h.run(command).unwrap();

    let description = h.history.undo_descriptions(1).remove(0);
    assert_eq!(description, "create polygon poly1");
    assert_eq!(h.value("poly1", Attribute::Sides), AttributeValue::Count(5));

    h.undo(1).unwrap();
    assert!(!h.exists("poly1"));
    h.redo(1).unwrap();
    assert!(h.exists("poly1"));
}

#[test]
fn test_create_with_bad_attribute_fails_cleanly() {
    let mut h = Harness::new();
    let command = CreateShape::new(h.window, ShapeKind::Rectangle).with_attribute("sides", "5");

    assert!(matches!(
        h.run(command),
        Err(DrawError::UnknownAttribute { .. })
    ));
    assert!(h.workspace.context(h.window).unwrap().surface().is_empty());
    assert_eq!(h.history.undo_depth(), 0);
}

#[test]
fn test_edit_restores_old_value_on_undo() {
    let mut h = Harness::new();
    h.create("x");

    h.run(EditAttribute::new(h.window, "x".into(), "width", "250"))
        .unwrap();
    assert_eq!(h.value("x", Attribute::Width), AttributeValue::Number(250.0));

    h.undo(1).unwrap();
    assert_eq!(h.value("x", Attribute::Width), AttributeValue::Number(100.0));

    h.redo(1).unwrap();
    assert_eq!(h.value("x", Attribute::Width), AttributeValue::Number(250.0));
}

#[test]
fn test_edit_with_bad_value_is_reported() {
    let mut h = Harness::new();
    h.create("x");

    let result = h.run(EditAttribute::new(h.window, "x".into(), "width", "wide"));
    assert_eq!(result, Ok(Execution::Applied));
    assert_eq!(h.reports.errors().count(), 1);
    assert_eq!(h.value("x", Attribute::Width), AttributeValue::Number(100.0));

    // Undoing the rejected edit changes nothing
    h.undo(1).unwrap();
    assert_eq!(h.value("x", Attribute::Width), AttributeValue::Number(100.0));
    assert!(h.exists("x"));
}

#[test]
fn test_edit_unknown_attribute_is_reported() {
    let mut h = Harness::new();
    h.create("x");

    h.run(EditAttribute::new(h.window, "x".into(), "text", "hello"))
        .unwrap();
    let errors: Vec<_> = h.reports.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("text"));
}

#[test]
fn test_layer_forward_and_undo() {
    let mut h = Harness::new();
    h.create("a");
    h.create("b");
    h.create("c");
    let before = h.layout();

    h.run(LayerChange::new(h.window, "a".into(), LayerDirection::Forward))
        .unwrap();
    assert_eq!(h.rank("a"), 1);
    assert_eq!(h.rank("b"), 0);

    h.undo(1).unwrap();
    assert_eq!(h.layout(), before);
}

#[test]
fn test_layer_at_extreme_is_warning_and_noop_undo() {
    let mut h = Harness::new();
    h.create("a");
    h.create("b");

    let result = h.run(LayerChange::new(h.window, "b".into(), LayerDirection::Front));
    assert_eq!(result, Ok(Execution::Applied));
    assert_eq!(h.reports.warnings().count(), 1);
    assert_eq!(h.history.undo_depth(), 3);

    h.undo(1).unwrap();
    assert_eq!(h.rank("b"), 1);
    assert_eq!(h.rank("a"), 0);
}

#[test]
fn test_layer_steps_use_position_not_rank() {
    let mut h = Harness::new();
    for name in ["a", "b", "c"] {
        h.create(name);
    }
    let before = h.layout();

    h.run(SetLayer::new(h.window, "a".into(), 2)).unwrap();
    assert_eq!(h.rank("a"), 2);
    let moved = h.layout();

    // `a` renders on top yet still sits at the first position
    h.run(LayerChange::new(h.window, "a".into(), LayerDirection::Backward))
        .unwrap();
    assert_eq!(h.reports.warnings().count(), 1);
    assert_eq!(h.layout(), moved);

    h.run(LayerChange::new(h.window, "c".into(), LayerDirection::Back))
        .unwrap();
    assert_eq!(h.rank("c"), 2);

    h.undo(3).unwrap();
    assert_eq!(h.layout(), before);
}

#[test]
fn test_layer_on_single_shape_fails() {
    let mut h = Harness::new();
    h.create("a");

    let result = h.run(LayerChange::new(h.window, "a".into(), LayerDirection::Back));
    assert_eq!(result, Err(DrawError::NotApplicable));
    assert_eq!(h.history.undo_depth(), 1);
}

#[test]
fn test_send_to_back_undo_restores_order() {
    let mut h = Harness::new();
    for name in ["a", "b", "c", "d"] {
        h.create(name);
    }
    let before = h.layout();

    h.run(LayerChange::new(h.window, "c".into(), LayerDirection::Back))
        .unwrap();
    assert_eq!(h.rank("c"), 0);

    h.undo(1).unwrap();
    assert_eq!(h.layout(), before);
}

#[test]
fn test_set_layer_and_undo() {
    let mut h = Harness::new();
    for name in ["a", "b", "c"] {
        h.create(name);
    }
    let before = h.layout();

    h.run(SetLayer::new(h.window, "c".into(), 0)).unwrap();
    assert_eq!(h.rank("c"), 0);
    assert_eq!(h.rank("a"), 2);

    h.undo(1).unwrap();
    assert_eq!(h.layout(), before);
}

#[test]
fn test_remove_and_undo_restores_shape_and_rank() {
    let mut h = Harness::new();
    for name in ["a", "b", "c"] {
        h.create(name);
    }
    h.run(EditAttribute::new(h.window, "b".into(), "fill", "red"))
        .unwrap();
    let fill = h.value("b", Attribute::Fill);

    h.run(RemoveShape::new(h.window, "b".into())).unwrap();
    assert!(!h.exists("b"));
    assert_eq!(h.rank("c"), 1);

    h.undo(1).unwrap();
    assert_eq!(h.rank("b"), 1);
    assert_eq!(h.rank("c"), 2);
    assert_eq!(h.value("b", Attribute::Fill), fill);
}

#[test]
fn test_move_and_undo() {
    let mut h = Harness::new();
    h.create("a");

    h.run(MoveShape::new(h.window, "a".into(), Vec2::new(10.0, -5.0)))
        .unwrap();
    assert_eq!(h.value("a", Attribute::X), AttributeValue::Number(10.0));
    assert_eq!(h.value("a", Attribute::Y), AttributeValue::Number(-5.0));

    h.undo(1).unwrap();
    assert_eq!(h.value("a", Attribute::X), AttributeValue::Number(0.0));
    assert_eq!(h.value("a", Attribute::Y), AttributeValue::Number(0.0));
}

// ============================================================================
// Interactive edit
// ============================================================================

#[test]
fn test_prompt_walks_through_inputs() {
    let mut prompt = EditPrompt::new();
    assert_eq!(prompt.awaiting(), Some(InputKind::Handle));

    prompt.resume(PromptInput::Value("x".to_string()));
    assert_eq!(prompt.awaiting(), Some(InputKind::Attribute));

    // Blank answers ask again
    prompt.resume(PromptInput::Value("   ".to_string()));
    assert_eq!(prompt.awaiting(), Some(InputKind::Attribute));

    prompt.resume(PromptInput::Value("height".to_string()));
    assert_eq!(
        prompt.resume(PromptInput::Value("30".to_string())),
        &PromptState::Complete
    );
    assert!(prompt.is_finished());

    let edit = prompt.build(ContextId(1)).unwrap();
    assert_eq!(edit.attribute, "height");
    assert_eq!(edit.value, "30");
}

#[test]
fn test_prompt_rejects_unknown_attribute() {
    let mut prompt = EditPrompt::new();
    prompt.resume(PromptInput::Value("x".to_string()));
    let state = prompt.resume(PromptInput::Value("colour".to_string())).clone();

    assert!(matches!(
        state,
        PromptState::Failed(DrawError::UnknownAttribute { .. })
    ));
    assert!(prompt.build(ContextId(1)).is_err());
}

#[test]
fn test_interactive_edit_applies_and_undoes() {
    let mut h = Harness::new();
    h.create("x");

    let mut edit = InteractiveEdit::new(h.window);
    for answer in ["x", "rotation", "45"] {
        edit.prompt.resume(PromptInput::Value(answer.to_string()));
    }
    assert_eq!(h.run(edit), Ok(Execution::Applied));
    assert_eq!(h.value("x", Attribute::Rotation), AttributeValue::Number(45.0));
    assert_eq!(
        h.history.undo_descriptions(1),
        vec!["set x rotation to 45"]
    );

    h.undo(1).unwrap();
    assert_eq!(h.value("x", Attribute::Rotation), AttributeValue::Number(0.0));
}

#[test]
fn test_interrupted_edit_is_not_recorded() {
    let mut h = Harness::new();
    h.create("x");
    h.undo(1).unwrap();
    h.redo(1).unwrap();

    let mut edit = InteractiveEdit::new(h.window);
    edit.prompt.resume(PromptInput::Value("x".to_string()));
    edit.prompt.resume(PromptInput::Interrupted);

    assert_eq!(h.run(edit), Ok(Execution::Interrupted));
    assert_eq!(h.history.undo_depth(), 1);
    let warnings: Vec<_> = h.reports.warnings().collect();
    assert_eq!(warnings, vec!["interactive edit interrupted"]);
}

#[test]
fn test_failed_prompt_is_reported_and_undo_warns() {
    let mut h = Harness::new();
    h.create("x");

    let mut edit = InteractiveEdit::new(h.window);
    edit.prompt.resume(PromptInput::Value("x".to_string()));
    edit.prompt.resume(PromptInput::Value("bogus".to_string()));

    assert_eq!(h.run(edit), Ok(Execution::Applied));
    assert_eq!(h.reports.errors().count(), 1);

    h.undo(1).unwrap();
    assert_eq!(h.reports.warnings().count(), 1);
    assert!(h.exists("x"));
}

// ============================================================================
// Plugin wiring
// ============================================================================

#[test]
fn test_plugin_applies_configured_capacity() {
    let mut app = App::new();
    app.insert_resource(AppConfig {
        data: AppConfigData {
            undo_capacity: 4,
            ..AppConfigData::default()
        },
        config_path: std::env::temp_dir().join("vectorforge-unused.json"),
        dirty: false,
    })
    .add_plugins((CanvasPlugin, HistoryPlugin));

    app.update();

    let history = app.world().resource::<CommandHistoryManager>();
    assert_eq!(history.default_capacity(), capacity(4));
    let window = app.world().resource::<Workspace>().current_id();
    assert!(window.is_some());
    assert_eq!(history.current_context(), window);
    assert_eq!(history.undo_capacity(), capacity(4));
}
