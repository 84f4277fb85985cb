//! Unit tests for the canvas module.

use super::presenter::{PresenterCall, RecordingPresenter};
use super::*;
use crate::error::DrawError;

fn recording_workspace() -> (Workspace, RecordingPresenter) {
    let presenter = RecordingPresenter::default();
    (Workspace::new(Box::new(presenter.clone())), presenter)
}

#[test]
fn test_create_context_becomes_current() {
    let (mut workspace, _) = recording_workspace();
    assert_eq!(workspace.require_current(), Err(DrawError::NoActiveContext));

    let first = workspace.create_context(None);
    let second = workspace.create_context(Some("Plans".to_string()));

    assert_eq!(workspace.current_id(), Some(second));
    assert_eq!(workspace.context(first).unwrap().title(), "Untitled 1");
    assert_eq!(workspace.context(second).unwrap().title(), "Plans");
    assert_eq!(
        workspace.take_events(),
        vec![
            WindowEvent::Created(first),
            WindowEvent::Switched(first),
            WindowEvent::Created(second),
            WindowEvent::Switched(second),
        ]
    );
    assert!(workspace.take_events().is_empty());
}

#[test]
fn test_display_and_destroy_reach_presenter() {
    let (mut workspace, presenter) = recording_workspace();
    let id = workspace.create_context(None);
    let handle = DrawableHandle::from("r");

    let rank = workspace
        .display(id, handle.clone(), Shape::new(ShapeKind::Rectangle))
        .unwrap();
    assert_eq!(rank, 0);
    let (shape, placement) = workspace.destroy(id, &handle).unwrap();
    assert_eq!(shape.kind, ShapeKind::Rectangle);
    assert_eq!(placement.rank, 0);

    assert_eq!(
        presenter.calls(),
        vec![
            PresenterCall::Display(id, handle.clone()),
            PresenterCall::Destroy(id, handle),
        ]
    );
}

#[test]
fn test_handles_are_unique_across_windows() {
    let (mut workspace, _) = recording_workspace();
    let first = workspace.create_context(None);
    let second = workspace.create_context(None);

    workspace
        .display(first, "shared".into(), Shape::new(ShapeKind::Line))
        .unwrap();
    let result = workspace.display(second, "shared".into(), Shape::new(ShapeKind::Line));
    assert!(matches!(result, Err(DrawError::InvalidArgument(_))));
}

#[test]
fn test_allocate_handle_skips_taken_names() {
    let (mut workspace, _) = recording_workspace();
    let id = workspace.create_context(None);
    workspace
        .display(id, "rect1".into(), Shape::new(ShapeKind::Rectangle))
        .unwrap();

    assert_eq!(workspace.allocate_handle(ShapeKind::Rectangle).as_str(), "rect2");
    assert_eq!(workspace.allocate_handle(ShapeKind::Ellipse).as_str(), "ellipse3");
}

#[test]
fn test_destroy_context_switches_to_remaining() {
    let (mut workspace, presenter) = recording_workspace();
    let first = workspace.create_context(None);
    let second = workspace.create_context(None);
    workspace
        .display(second, "a".into(), Shape::new(ShapeKind::Ellipse))
        .unwrap();
    workspace.take_events();

    workspace.destroy_context(second).unwrap();

    assert_eq!(workspace.current_id(), Some(first));
    assert_eq!(
        workspace.take_events(),
        vec![WindowEvent::Destroyed(second), WindowEvent::Switched(first)]
    );
    assert!(presenter
        .calls()
        .contains(&PresenterCall::Destroy(second, "a".into())));
    assert!(!workspace.is_handle_taken(&"a".into()));
    assert_eq!(
        workspace.destroy_context(second),
        Err(DrawError::ContextNotFound(second))
    );
}

#[test]
fn test_switch_to_unknown_window() {
    let (mut workspace, _) = recording_workspace();
    workspace.create_context(None);
    assert_eq!(
        workspace.switch_to(ContextId(9)),
        Err(DrawError::ContextNotFound(ContextId(9)))
    );
}

#[test]
fn test_failed_reorder_does_not_redraw() {
    let (mut workspace, presenter) = recording_workspace();
    let id = workspace.create_context(None);
    let handle = DrawableHandle::from("solo");
    workspace
        .display(id, handle.clone(), Shape::new(ShapeKind::Text))
        .unwrap();

    let result = workspace.reorder(id, &handle, |surface| surface.bring_forward(&handle));
    assert_eq!(result, Err(DrawError::NotApplicable));
    assert_eq!(presenter.calls().len(), 1);
}

#[test]
fn test_update_shape_redraws() {
    let (mut workspace, presenter) = recording_workspace();
    let id = workspace.create_context(None);
    let handle = DrawableHandle::from("t");
    workspace
        .display(id, handle.clone(), Shape::new(ShapeKind::Text))
        .unwrap();

    let previous = workspace
        .update_shape(id, &handle, |shape| {
            shape.set(Attribute::Text, AttributeValue::Text("hi".to_string()))
        })
        .unwrap();
    assert_eq!(previous, AttributeValue::Text(String::new()));
    assert_eq!(
        presenter.calls().last(),
        Some(&PresenterCall::Redraw(id, handle))
    );
}
