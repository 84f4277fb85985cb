//! Apply and reverse for each command.

use bevy::prelude::*;

use super::commands::{
    CreateShape, EditAttribute, InteractiveEdit, LayerChange, LayerDirection, MoveShape, Redraw,
    RemoveShape, Reversible, SetLayer,
};
use super::data_types::ShapeSnapshot;
use super::prompt::PromptState;
use crate::canvas::{Attribute, AttributeValue, OrderedSurface, Shape, Workspace};
use crate::error::{DrawError, DrawResult};
use crate::report::Reporter;

fn never_applied(what: &str) -> DrawError {
    DrawError::InvalidUse(format!("cannot undo {} before it was done", what))
}

impl Reversible for CreateShape {
    fn apply(&mut self, workspace: &mut Workspace, _reporter: &mut dyn Reporter) -> DrawResult<()> {
        let mut shape = Shape::new(self.kind);
        for (name, raw) in &self.attributes {
            let attribute = Attribute::parse(name, self.kind)?;
            shape.set(attribute, attribute.parse_value(raw)?)?;
        }

        let handle = match (&self.handle, &self.name) {
            (Some(handle), _) | (None, Some(handle)) => handle.clone(),
            (None, None) => workspace.allocate_handle(self.kind),
        };
        workspace.display(self.context, handle.clone(), shape)?;
        info!("Created {} {} in window {}", self.kind, handle, self.context);
        self.handle = Some(handle);
        Ok(())
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        let handle = self
            .handle
            .as_ref()
            .ok_or_else(|| never_applied("a shape creation"))?;
        workspace.destroy(self.context, handle)?;
        Ok(())
    }

    fn description(&self) -> String {
        match self.handle.as_ref().or(self.name.as_ref()) {
            Some(handle) => format!("create {} {}", self.kind, handle),
            None => format!("create {}", self.kind),
        }
    }
}

impl EditAttribute {
    fn set_new_value(&self, workspace: &mut Workspace) -> DrawResult<(Attribute, AttributeValue)> {
        let kind = workspace.context(self.context)?.shape(&self.handle)?.kind;
        let attribute = Attribute::parse(&self.attribute, kind)?;
        let value = attribute.parse_value(&self.value)?;
        let previous = workspace.update_shape(self.context, &self.handle, |shape| {
            shape.set(attribute, value)
        })?;
        Ok((attribute, previous))
    }
}

impl Reversible for EditAttribute {
    fn apply(&mut self, workspace: &mut Workspace, reporter: &mut dyn Reporter) -> DrawResult<()> {
        self.applied = true;
        match self.set_new_value(workspace) {
            Ok(previous) => {
                self.previous = Some(previous);
                Ok(())
            }
            Err(
                error @ (DrawError::UnknownAttribute { .. } | DrawError::InvalidValueFormat { .. }),
            ) => {
                self.previous = None;
                reporter.report_error(&error.to_string());
                Ok(())
            }
            Err(error) => {
                self.applied = false;
                Err(error)
            }
        }
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        if !self.applied {
            return Err(never_applied("an edit"));
        }
        let Some((attribute, old_value)) = self.previous.clone() else {
            debug!("{} changed nothing, nothing to revert", self.description());
            return Ok(());
        };
        workspace.update_shape(self.context, &self.handle, |shape| {
            shape.set(attribute, old_value)
        })?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("set {} {} to {}", self.handle, self.attribute, self.value)
    }
}

fn run_direction(
    surface: &mut OrderedSurface,
    handle: &crate::canvas::DrawableHandle,
    direction: LayerDirection,
) -> DrawResult<usize> {
    match direction {
        LayerDirection::Forward => surface.bring_forward(handle),
        LayerDirection::Backward => surface.send_backward(handle),
        LayerDirection::Front => surface.bring_to_front(handle),
        LayerDirection::Back => surface.send_to_back(handle),
    }
}

impl Reversible for LayerChange {
    fn apply(&mut self, workspace: &mut Workspace, reporter: &mut dyn Reporter) -> DrawResult<()> {
        let direction = self.direction;
        let handle = &self.handle;
        let result = workspace.reorder(self.context, handle, |surface| {
            run_direction(surface, handle, direction)
        });

        self.applied = true;
        match result {
            Ok(previous_position) => {
                self.changed = true;
                self.previous_position = previous_position;
                Ok(())
            }
            Err(error @ DrawError::AlreadyAtExtreme { .. }) => {
                self.changed = false;
                reporter.report_warning(&error.to_string());
                Ok(())
            }
            Err(error) => {
                self.applied = false;
                self.changed = false;
                Err(error)
            }
        }
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        if !self.applied {
            return Err(never_applied("a layer change"));
        }
        if !self.changed {
            debug!("{} changed nothing, nothing to revert", self.description());
            return Ok(());
        }

        let handle = &self.handle;
        let direction = self.direction;
        let previous_position = self.previous_position;
        workspace.reorder(self.context, handle, |surface| match direction {
            LayerDirection::Forward | LayerDirection::Backward => {
                run_direction(surface, handle, direction.opposite()).map(|_| ())
            }
            LayerDirection::Front | LayerDirection::Back => {
                if previous_position < surface.len() {
                    surface
                        .walk_to_position(handle, previous_position)
                        .map(|_| ())
                } else {
                    // The surface shrank since; the best we can do is the
                    // opposite extreme.
                    match run_direction(surface, handle, direction.opposite()) {
                        Ok(_) | Err(DrawError::AlreadyAtExtreme { .. }) => Ok(()),
                        Err(error) => Err(error),
                    }
                }
            }
        })
    }

    fn description(&self) -> String {
        match self.direction {
            LayerDirection::Forward => format!("bring {} forward", self.handle),
            LayerDirection::Backward => format!("send {} backward", self.handle),
            LayerDirection::Front => format!("bring {} to front", self.handle),
            LayerDirection::Back => format!("send {} to back", self.handle),
        }
    }
}

impl Reversible for SetLayer {
    fn apply(&mut self, workspace: &mut Workspace, _reporter: &mut dyn Reporter) -> DrawResult<()> {
        let handle = &self.handle;
        let position = self.position;
        let previous = workspace.reorder(self.context, handle, |surface| {
            surface.move_to_layer(handle, position)
        })?;
        self.previous = Some(previous);
        Ok(())
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        let previous = self.previous.ok_or_else(|| never_applied("a layer move"))?;
        let handle = &self.handle;
        let position = self.position;
        // The exchange is its own inverse
        let rank = workspace.reorder(self.context, handle, |surface| {
            surface.move_to_layer(handle, position)?;
            surface.rank_of(handle)
        })?;
        if rank != previous {
            warn!(
                "{} came back on layer {} instead of {}",
                handle, rank, previous
            );
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("move {} to layer {}", self.handle, self.position)
    }
}

impl Reversible for MoveShape {
    fn apply(&mut self, workspace: &mut Workspace, _reporter: &mut dyn Reporter) -> DrawResult<()> {
        let delta = self.delta;
        workspace.update_shape(self.context, &self.handle, |shape| {
            shape.translate(delta);
            Ok(())
        })?;
        self.applied = true;
        Ok(())
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        if !self.applied {
            return Err(never_applied("a move"));
        }
        let delta = self.delta;
        workspace.update_shape(self.context, &self.handle, |shape| {
            shape.translate(-delta);
            Ok(())
        })
    }

    fn description(&self) -> String {
        format!("move {} by ({}, {})", self.handle, self.delta.x, self.delta.y)
    }
}

impl Reversible for RemoveShape {
    fn apply(&mut self, workspace: &mut Workspace, _reporter: &mut dyn Reporter) -> DrawResult<()> {
        let (shape, placement) = workspace.destroy(self.context, &self.handle)?;
        info!("Removed {} from window {}", self.handle, self.context);
        self.snapshot = Some(ShapeSnapshot { shape, placement });
        Ok(())
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        let snapshot = self
            .snapshot
            .clone()
            .ok_or_else(|| never_applied("a removal"))?;
        workspace.restore(
            self.context,
            self.handle.clone(),
            snapshot.shape,
            snapshot.placement,
        )
    }

    fn description(&self) -> String {
        format!("delete {}", self.handle)
    }
}

impl Reversible for InteractiveEdit {
    fn apply(&mut self, workspace: &mut Workspace, reporter: &mut dyn Reporter) -> DrawResult<()> {
        match self.prompt.state() {
            PromptState::Complete => {}
            PromptState::Cancelled => return Err(DrawError::KeyboardInterrupt),
            PromptState::Failed(error) => {
                reporter.report_error(&error.to_string());
                return Ok(());
            }
            PromptState::Awaiting(kind) => {
                return Err(DrawError::InvalidUse(format!(
                    "the edit is still waiting for the {}",
                    kind.prompt()
                )));
            }
        }

        if self.inner.is_none() {
            self.inner = Some(Box::new(self.prompt.build(self.context)?));
        }
        match self.inner.as_mut() {
            Some(inner) => inner.apply(workspace, reporter),
            None => Ok(()),
        }
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.reverse(workspace, reporter),
            None => {
                reporter.report_warning("the interactive edit made no change to undo");
                Ok(())
            }
        }
    }

    fn description(&self) -> String {
        match &self.inner {
            Some(inner) => inner.description(),
            None => "interactive edit".to_string(),
        }
    }
}

impl Reversible for Redraw {
    fn apply(&mut self, workspace: &mut Workspace, _reporter: &mut dyn Reporter) -> DrawResult<()> {
        workspace.redraw(self.context, &self.handle)
    }

    fn reverse(
        &mut self,
        _workspace: &mut Workspace,
        _reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        Ok(())
    }

    fn description(&self) -> String {
        format!("redraw {}", self.handle)
    }

    fn is_undoable(&self) -> bool {
        false
    }
}
