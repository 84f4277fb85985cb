//! Turning console lines into commands.
//!
//! Drawing commands are built by factories looked up by name in a
//! [`CommandRegistry`]. Everything else (history control, windows,
//! inspection) is a [`ConsoleAction`].

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::canvas::{ContextId, DrawableHandle, ShapeKind};
use crate::editor::history::{
    CreateShape, DrawCommand, EditAttribute, LayerChange, LayerDirection, MoveShape, Redraw,
    RemoveShape, SetLayer,
};
use crate::error::{DrawError, DrawResult};

/// Builds a drawing command from its arguments for the given window.
pub type CommandFactory = fn(&[&str], ContextId) -> DrawResult<DrawCommand>;

/// Drawing command factories keyed by command name.
pub struct CommandRegistry {
    factories: BTreeMap<&'static str, CommandFactory>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("create", build_create);
        registry.register("set", build_set);
        registry.register("forward", build_forward);
        registry.register("backward", build_backward);
        registry.register("front", build_front);
        registry.register("back", build_back);
        registry.register("layer", build_layer);
        registry.register("move", build_move);
        registry.register("delete", build_delete);
        registry.register("redraw", build_redraw);
        registry
    }
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, factory: CommandFactory) {
        if self.factories.insert(name, factory).is_some() {
            warn!("Command '{}' registered twice, keeping the latest", name);
        }
    }

    #[allow(dead_code)]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn build(&self, name: &str, args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DrawError::UnknownCommand(name.to_string()))?;
        factory(args, context)
    }
}

fn usage(text: &str) -> DrawError {
    DrawError::InvalidArgument(format!("usage: {}", text))
}

fn single_handle(args: &[&str], text: &str) -> DrawResult<DrawableHandle> {
    match args {
        [handle] => Ok(DrawableHandle::from(*handle)),
        _ => Err(usage(text)),
    }
}

fn parse_number(raw: &str, what: &str) -> DrawResult<f32> {
    raw.parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| DrawError::InvalidArgument(format!("{} must be a number, got '{}'", what, raw)))
}

fn parse_count(raw: &str, what: &str) -> DrawResult<usize> {
    raw.parse::<usize>().map_err(|_| {
        DrawError::InvalidArgument(format!("{} must be a whole number, got '{}'", what, raw))
    })
}

/// `create <kind> [name=<n>] [<attr>=<value> ...]`
fn build_create(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    let (kind, rest) = args
        .split_first()
        .ok_or_else(|| usage("create <kind> [name=<name>] [<attribute>=<value> ...]"))?;
    let kind: ShapeKind = kind.parse()?;

    let mut command = CreateShape::new(context, kind);
    for pair in rest {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            DrawError::InvalidArgument(format!("expected <attribute>=<value>, got '{}'", pair))
        })?;
        if key == "name" {
            command = command.named(value);
        } else {
            command = command.with_attribute(key, value);
        }
    }
    Ok(command.into())
}

/// `set <handle> <attr> <value...>`; the value may contain spaces
fn build_set(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    match args {
        [handle, attribute, value @ ..] if !value.is_empty() => Ok(EditAttribute::new(
            context,
            DrawableHandle::from(*handle),
            *attribute,
            value.join(" "),
        )
        .into()),
        _ => Err(usage("set <object> <attribute> <value>")),
    }
}

fn build_layer_change(
    args: &[&str],
    context: ContextId,
    direction: LayerDirection,
) -> DrawResult<DrawCommand> {
    let handle = single_handle(args, &format!("{} <object>", direction))?;
    Ok(LayerChange::new(context, handle, direction).into())
}

fn build_forward(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    build_layer_change(args, context, LayerDirection::Forward)
}

fn build_backward(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    build_layer_change(args, context, LayerDirection::Backward)
}

fn build_front(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    build_layer_change(args, context, LayerDirection::Front)
}

fn build_back(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    build_layer_change(args, context, LayerDirection::Back)
}

/// `layer <handle> <rank>` or `layer <handle> <direction>`
fn build_layer(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    let [handle, target] = args else {
        return Err(usage("layer <object> <layer|forward|backward|front|back>"));
    };
    let handle = DrawableHandle::from(*handle);
    if let Ok(direction) = target.parse::<LayerDirection>() {
        return Ok(LayerChange::new(context, handle, direction).into());
    }
    Ok(SetLayer::new(context, handle, parse_count(target, "layer")?).into())
}

/// `move <handle> <dx> <dy>`
fn build_move(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    match args {
        [handle, dx, dy] => {
            let delta = Vec2::new(parse_number(dx, "dx")?, parse_number(dy, "dy")?);
            Ok(MoveShape::new(context, DrawableHandle::from(*handle), delta).into())
        }
        _ => Err(usage("move <object> <dx> <dy>")),
    }
}

fn build_delete(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    let handle = single_handle(args, "delete <object>")?;
    Ok(RemoveShape::new(context, handle).into())
}

fn build_redraw(args: &[&str], context: ContextId) -> DrawResult<DrawCommand> {
    let handle = single_handle(args, "redraw <object>")?;
    Ok(DrawCommand::Redraw(Redraw { context, handle }))
}

/// A console line that is not a drawing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    Empty,
    /// A drawing command, built later through the registry
    Draw {
        name: String,
        args: Vec<String>,
    },
    Edit,
    Undo(usize),
    Redo(usize),
    Capacity(usize),
    DefaultCapacity(usize),
    History,
    WindowNew(Option<String>),
    WindowSwitch(ContextId),
    /// Close the given window, or the current one
    WindowClose(Option<ContextId>),
    WindowList,
    List,
    Show(DrawableHandle),
    Help,
    Quit,
}

fn parse_context_id(raw: &str) -> DrawResult<ContextId> {
    raw.trim_start_matches('#')
        .parse::<u32>()
        .map(ContextId)
        .map_err(|_| DrawError::InvalidArgument(format!("'{}' is not a window id", raw)))
}

fn optional_count(args: &[&str], text: &str) -> DrawResult<usize> {
    match args {
        [] => Ok(1),
        [count] => parse_count(count, "count"),
        _ => Err(usage(text)),
    }
}

/// Split a line into an action. Drawing command names are only checked
/// against the registry when the command is built.
pub fn parse_line(line: &str) -> DrawResult<ConsoleAction> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = words.split_first() else {
        return Ok(ConsoleAction::Empty);
    };

    let action = match (*name, args) {
        ("edit", []) => ConsoleAction::Edit,
        ("undo", args) => ConsoleAction::Undo(optional_count(args, "undo [count]")?),
        ("redo", args) => ConsoleAction::Redo(optional_count(args, "redo [count]")?),
        ("capacity", ["default", n]) => ConsoleAction::DefaultCapacity(parse_count(n, "capacity")?),
        ("capacity", [n]) => ConsoleAction::Capacity(parse_count(n, "capacity")?),
        ("capacity", _) => return Err(usage("capacity [default] <size>")),
        ("history", []) => ConsoleAction::History,
        ("window", ["new"]) => ConsoleAction::WindowNew(None),
        ("window", ["new", title @ ..]) => ConsoleAction::WindowNew(Some(title.join(" "))),
        ("window", ["switch", id]) => ConsoleAction::WindowSwitch(parse_context_id(id)?),
        ("window", ["close"]) => ConsoleAction::WindowClose(None),
        ("window", ["close", id]) => ConsoleAction::WindowClose(Some(parse_context_id(id)?)),
        ("window", ["list"]) => ConsoleAction::WindowList,
        ("window", _) => return Err(usage("window new [title] | switch <id> | close [id] | list")),
        ("list", []) => ConsoleAction::List,
        ("show", [handle]) => ConsoleAction::Show(DrawableHandle::from(*handle)),
        ("show", _) => return Err(usage("show <object>")),
        ("help" | "?", _) => ConsoleAction::Help,
        ("quit" | "exit", []) => ConsoleAction::Quit,
        (name, args) => ConsoleAction::Draw {
            name: name.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        },
    };
    Ok(action)
}

pub const HELP: &str = "\
Drawing (undoable):
  create <kind> [name=<name>] [<attr>=<value> ...]   kinds: rect ellipse line polygon text
  set <object> <attribute> <value>
  edit                                               prompt for object, attribute and value ('cancel' aborts)
  forward|backward|front|back <object>
  layer <object> <layer|direction>
  move <object> <dx> <dy>
  delete <object>
Other:
  redraw <object>
  undo [n], redo [n], history
  capacity <n>, capacity default <n>
  window new [title] | switch <id> | close [id] | list
  list, show <object>, help, quit";
