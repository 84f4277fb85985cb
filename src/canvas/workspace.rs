//! Windows (drawing contexts) and the drawables they own.

use std::collections::{BTreeMap, HashMap};

use bevy::prelude::*;

use super::presenter::{LogPresenter, Presenter};
use super::{ContextId, DrawableHandle, OrderedSurface, Placement, Shape, ShapeKind};
use crate::error::{DrawError, DrawResult};

/// Notification raised by the window subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Created(ContextId),
    Switched(ContextId),
    Destroyed(ContextId),
}

/// One window: its layer order and the state of every drawable in it.
#[derive(Debug)]
pub struct Context {
    id: ContextId,
    title: String,
    surface: OrderedSurface,
    shapes: HashMap<DrawableHandle, Shape>,
}

impl Context {
    fn new(id: ContextId, title: String) -> Self {
        Self {
            id,
            title,
            surface: OrderedSurface::new(),
            shapes: HashMap::new(),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn surface(&self) -> &OrderedSurface {
        &self.surface
    }

    pub fn shape(&self, handle: &DrawableHandle) -> DrawResult<&Shape> {
        self.shapes
            .get(handle)
            .ok_or_else(|| DrawError::HandleNotFound(handle.clone()))
    }
}

/// Every open window plus the presenter they draw to.
#[derive(Resource)]
pub struct Workspace {
    contexts: BTreeMap<ContextId, Context>,
    current: Option<ContextId>,
    next_context: u32,
    next_handle: u64,
    presenter: Box<dyn Presenter>,
    events: Vec<WindowEvent>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Box::new(LogPresenter))
    }
}

impl Workspace {
    pub fn new(presenter: Box<dyn Presenter>) -> Self {
        Self {
            contexts: BTreeMap::new(),
            current: None,
            next_context: 1,
            next_handle: 1,
            presenter,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Windows
    // ========================================================================

    /// Open a new window and make it current.
    pub fn create_context(&mut self, title: Option<String>) -> ContextId {
        let id = ContextId(self.next_context);
        self.next_context += 1;
        let title = title.unwrap_or_else(|| format!("Untitled {}", id.0));
        info!("Created window {} \"{}\"", id, title);
        self.contexts.insert(id, Context::new(id, title));
        self.events.push(WindowEvent::Created(id));
        self.current = Some(id);
        self.events.push(WindowEvent::Switched(id));
        id
    }

    /// Close a window, destroying everything drawn in it. If it was current,
    /// the most recently opened remaining window becomes current.
    pub fn destroy_context(&mut self, id: ContextId) -> DrawResult<()> {
        let context = self
            .contexts
            .remove(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        for handle in context.surface.members() {
            self.presenter.destroy_object(id, handle);
        }
        info!(
            "Closed window {} ({} objects destroyed)",
            id,
            context.surface.len()
        );
        self.events.push(WindowEvent::Destroyed(id));

        if self.current == Some(id) {
            self.current = self.contexts.keys().next_back().copied();
            if let Some(next) = self.current {
                self.events.push(WindowEvent::Switched(next));
            }
        }
        Ok(())
    }

    pub fn switch_to(&mut self, id: ContextId) -> DrawResult<()> {
        if !self.contexts.contains_key(&id) {
            return Err(DrawError::ContextNotFound(id));
        }
        if self.current != Some(id) {
            debug!("Switched to window {}", id);
            self.current = Some(id);
            self.events.push(WindowEvent::Switched(id));
        }
        Ok(())
    }

    pub fn current_id(&self) -> Option<ContextId> {
        self.current
    }

    pub fn require_current(&self) -> DrawResult<ContextId> {
        self.current.ok_or(DrawError::NoActiveContext)
    }

    pub fn context(&self, id: ContextId) -> DrawResult<&Context> {
        self.contexts.get(&id).ok_or(DrawError::ContextNotFound(id))
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    /// Drain window notifications raised since the last call.
    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Drawables
    // ========================================================================

    /// Whether any window holds an object with this handle.
    pub fn is_handle_taken(&self, handle: &DrawableHandle) -> bool {
        self.contexts
            .values()
            .any(|context| context.shapes.contains_key(handle))
    }

    /// Generate a fresh handle such as `rect7`. Numbers are never reused.
    pub fn allocate_handle(&mut self, kind: ShapeKind) -> DrawableHandle {
        loop {
            let handle = DrawableHandle::new(format!("{}{}", kind.prefix(), self.next_handle));
            self.next_handle += 1;
            if !self.is_handle_taken(&handle) {
                return handle;
            }
        }
    }

    /// Put a drawable on top of a window. Returns its rank.
    pub fn display(
        &mut self,
        id: ContextId,
        handle: DrawableHandle,
        shape: Shape,
    ) -> DrawResult<usize> {
        self.require_free(&handle)?;
        let context = self
            .contexts
            .get_mut(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        let rank = context.surface.add(handle.clone())?;
        self.presenter.display_object(id, &handle, &shape);
        context.shapes.insert(handle, shape);
        Ok(rank)
    }

    /// Put a removed drawable back where it was.
    pub fn restore(
        &mut self,
        id: ContextId,
        handle: DrawableHandle,
        shape: Shape,
        placement: Placement,
    ) -> DrawResult<()> {
        self.require_free(&handle)?;
        let context = self
            .contexts
            .get_mut(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        context.surface.insert(handle.clone(), placement)?;
        self.presenter.display_object(id, &handle, &shape);
        context.shapes.insert(handle, shape);
        Ok(())
    }

    /// Remove a drawable. Returns its state and where it sat.
    pub fn destroy(
        &mut self,
        id: ContextId,
        handle: &DrawableHandle,
    ) -> DrawResult<(Shape, Placement)> {
        let context = self
            .contexts
            .get_mut(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        let placement = context.surface.remove(handle)?;
        let shape = context
            .shapes
            .remove(handle)
            .ok_or_else(|| DrawError::HandleNotFound(handle.clone()))?;
        self.presenter.destroy_object(id, handle);
        Ok((shape, placement))
    }

    pub fn redraw(&mut self, id: ContextId, handle: &DrawableHandle) -> DrawResult<()> {
        let context = self
            .contexts
            .get(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        let shape = context.shape(handle)?;
        self.presenter.redraw_object(id, handle, shape);
        Ok(())
    }

    fn require_free(&self, handle: &DrawableHandle) -> DrawResult<()> {
        if self.is_handle_taken(handle) {
            return Err(DrawError::InvalidArgument(format!(
                "the name '{}' is already in use",
                handle
            )));
        }
        Ok(())
    }

    /// Mutate one drawable's state and redraw it.
    pub fn update_shape<T>(
        &mut self,
        id: ContextId,
        handle: &DrawableHandle,
        update: impl FnOnce(&mut Shape) -> DrawResult<T>,
    ) -> DrawResult<T> {
        let context = self
            .contexts
            .get_mut(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        let shape = context
            .shapes
            .get_mut(handle)
            .ok_or_else(|| DrawError::HandleNotFound(handle.clone()))?;
        let result = update(shape)?;
        self.presenter.redraw_object(id, handle, shape);
        Ok(result)
    }

    /// Run a layer operation on a window's surface, redrawing the moved
    /// object when it succeeds.
    pub fn reorder<T>(
        &mut self,
        id: ContextId,
        handle: &DrawableHandle,
        operation: impl FnOnce(&mut OrderedSurface) -> DrawResult<T>,
    ) -> DrawResult<T> {
        let context = self
            .contexts
            .get_mut(&id)
            .ok_or(DrawError::ContextNotFound(id))?;
        let result = operation(&mut context.surface)?;
        trace!(
            "Reordered {} in window {} ({} swaps so far)",
            handle,
            id,
            context.surface.swap_count()
        );
        if let Some(shape) = context.shapes.get(handle) {
            self.presenter.redraw_object(id, handle, shape);
        }
        Ok(result)
    }
}
