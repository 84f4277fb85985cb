//! Reversible drawing commands.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use super::data_types::ShapeSnapshot;
use super::prompt::EditPrompt;
use crate::canvas::{Attribute, AttributeValue, ContextId, DrawableHandle, ShapeKind, Workspace};
use crate::error::{DrawError, DrawResult};
use crate::report::Reporter;

/// The apply/reverse contract every command satisfies.
pub trait Reversible {
    /// Perform the action, capturing whatever is needed to reverse it.
    fn apply(&mut self, workspace: &mut Workspace, reporter: &mut dyn Reporter) -> DrawResult<()>;

    /// Undo the most recent `apply`.
    fn reverse(&mut self, workspace: &mut Workspace, reporter: &mut dyn Reporter)
    -> DrawResult<()>;

    /// Short human-readable summary, e.g. "create rectangle rect3".
    fn description(&self) -> String;

    /// Commands that are not undoable are executed but never recorded.
    fn is_undoable(&self) -> bool {
        true
    }
}

/// Create a shape and display it on a window.
#[derive(Debug, Clone)]
pub struct CreateShape {
    pub context: ContextId,
    pub kind: ShapeKind,
    /// Explicit name; a handle is generated when absent
    pub name: Option<DrawableHandle>,
    /// Initial `(attribute, raw value)` pairs
    pub attributes: Vec<(String, String)>,
    /// Handle captured by the first successful apply, reused on redo
    pub(super) handle: Option<DrawableHandle>,
}

impl CreateShape {
    pub fn new(context: ContextId, kind: ShapeKind) -> Self {
        Self {
            context,
            kind,
            name: None,
            attributes: Vec::new(),
            handle: None,
        }
    }

    pub fn named(mut self, name: impl Into<DrawableHandle>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((attribute.into(), value.into()));
        self
    }
}

/// Set one named attribute of a shape.
#[derive(Debug, Clone)]
pub struct EditAttribute {
    pub context: ContextId,
    pub handle: DrawableHandle,
    pub attribute: String,
    pub value: String,
    pub(super) applied: bool,
    /// Attribute and the value it had before the edit; `None` when the edit
    /// was rejected.
    pub(super) previous: Option<(Attribute, AttributeValue)>,
}

impl EditAttribute {
    pub fn new(
        context: ContextId,
        handle: DrawableHandle,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            context,
            handle,
            attribute: attribute.into(),
            value: value.into(),
            applied: false,
            previous: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerDirection {
    Forward,
    Backward,
    Front,
    Back,
}

impl LayerDirection {
    /// The direction whose primitive undoes this one.
    pub fn opposite(&self) -> LayerDirection {
        match self {
            LayerDirection::Forward => LayerDirection::Backward,
            LayerDirection::Backward => LayerDirection::Forward,
            LayerDirection::Front => LayerDirection::Back,
            LayerDirection::Back => LayerDirection::Front,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerDirection::Forward => "forward",
            LayerDirection::Backward => "backward",
            LayerDirection::Front => "front",
            LayerDirection::Back => "back",
        }
    }
}

impl FromStr for LayerDirection {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" | "raise" => Ok(LayerDirection::Forward),
            "backward" | "lower" => Ok(LayerDirection::Backward),
            "front" | "top" => Ok(LayerDirection::Front),
            "back" | "bottom" => Ok(LayerDirection::Back),
            other => Err(DrawError::InvalidArgument(format!(
                "unknown layer direction '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for LayerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Move a shape one step or all the way in render order.
#[derive(Debug, Clone)]
pub struct LayerChange {
    pub context: ContextId,
    pub handle: DrawableHandle,
    pub direction: LayerDirection,
    pub(super) applied: bool,
    /// False when the shape was already at the requested extreme
    pub(super) changed: bool,
    /// Position the shape held before the change
    pub(super) previous_position: usize,
}

impl LayerChange {
    pub fn new(context: ContextId, handle: DrawableHandle, direction: LayerDirection) -> Self {
        Self {
            context,
            handle,
            direction,
            applied: false,
            changed: false,
            previous_position: 0,
        }
    }
}

/// Exchange a shape's rank with the rank held at `position`.
#[derive(Debug, Clone)]
pub struct SetLayer {
    pub context: ContextId,
    pub handle: DrawableHandle,
    pub position: usize,
    /// Rank before the exchange
    pub(super) previous: Option<usize>,
}

impl SetLayer {
    pub fn new(context: ContextId, handle: DrawableHandle, position: usize) -> Self {
        Self {
            context,
            handle,
            position,
            previous: None,
        }
    }
}

/// Translate a shape.
#[derive(Debug, Clone)]
pub struct MoveShape {
    pub context: ContextId,
    pub handle: DrawableHandle,
    pub delta: Vec2,
    pub(super) applied: bool,
}

impl MoveShape {
    pub fn new(context: ContextId, handle: DrawableHandle, delta: Vec2) -> Self {
        Self {
            context,
            handle,
            delta,
            applied: false,
        }
    }
}

/// Destroy a shape, keeping enough to bring it back exactly.
#[derive(Debug, Clone)]
pub struct RemoveShape {
    pub context: ContextId,
    pub handle: DrawableHandle,
    pub(super) snapshot: Option<ShapeSnapshot>,
}

impl RemoveShape {
    pub fn new(context: ContextId, handle: DrawableHandle) -> Self {
        Self {
            context,
            handle,
            snapshot: None,
        }
    }
}

/// Multi-step edit driven by console prompts. The wrapped
/// [`EditAttribute`] only exists once the prompt has all three answers.
#[derive(Debug, Clone)]
pub struct InteractiveEdit {
    pub context: ContextId,
    pub prompt: EditPrompt,
    pub(super) inner: Option<Box<EditAttribute>>,
}

impl InteractiveEdit {
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            prompt: EditPrompt::new(),
            inner: None,
        }
    }
}

/// Ask the presenter to draw a shape again. Not undoable.
#[derive(Debug, Clone)]
pub struct Redraw {
    pub context: ContextId,
    pub handle: DrawableHandle,
}

/// Every command the console can issue.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Create(CreateShape),
    Edit(EditAttribute),
    Layer(LayerChange),
    SetLayer(SetLayer),
    Move(MoveShape),
    Remove(RemoveShape),
    Interactive(InteractiveEdit),
    Redraw(Redraw),
}

impl DrawCommand {
    fn as_reversible(&self) -> &dyn Reversible {
        match self {
            DrawCommand::Create(command) => command,
            DrawCommand::Edit(command) => command,
            DrawCommand::Layer(command) => command,
            DrawCommand::SetLayer(command) => command,
            DrawCommand::Move(command) => command,
            DrawCommand::Remove(command) => command,
            DrawCommand::Interactive(command) => command,
            DrawCommand::Redraw(command) => command,
        }
    }

    fn as_reversible_mut(&mut self) -> &mut dyn Reversible {
        match self {
            DrawCommand::Create(command) => command,
            DrawCommand::Edit(command) => command,
            DrawCommand::Layer(command) => command,
            DrawCommand::SetLayer(command) => command,
            DrawCommand::Move(command) => command,
            DrawCommand::Remove(command) => command,
            DrawCommand::Interactive(command) => command,
            DrawCommand::Redraw(command) => command,
        }
    }
}

impl Reversible for DrawCommand {
    fn apply(&mut self, workspace: &mut Workspace, reporter: &mut dyn Reporter) -> DrawResult<()> {
        self.as_reversible_mut().apply(workspace, reporter)
    }

    fn reverse(
        &mut self,
        workspace: &mut Workspace,
        reporter: &mut dyn Reporter,
    ) -> DrawResult<()> {
        self.as_reversible_mut().reverse(workspace, reporter)
    }

    fn description(&self) -> String {
        self.as_reversible().description()
    }

    fn is_undoable(&self) -> bool {
        self.as_reversible().is_undoable()
    }
}

macro_rules! impl_from_command {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for DrawCommand {
                fn from(command: $ty) -> Self {
                    DrawCommand::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    Create(CreateShape),
    Edit(EditAttribute),
    Layer(LayerChange),
    SetLayer(SetLayer),
    Move(MoveShape),
    Remove(RemoveShape),
    Interactive(InteractiveEdit),
    Redraw(Redraw),
);
