//! Drawable shapes and their named, editable attributes.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use crate::error::{DrawError, DrawResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Polygon,
    Text,
}

impl ShapeKind {
    /// Prefix used when generating handle names.
    pub fn prefix(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rect",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Polygon => "poly",
            ShapeKind::Text => "text",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Text => "text",
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Ellipse,
            ShapeKind::Line,
            ShapeKind::Polygon,
            ShapeKind::Text,
        ]
    }
}

impl FromStr for ShapeKind {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rect" | "rectangle" => Ok(ShapeKind::Rectangle),
            "ellipse" | "oval" | "circle" => Ok(ShapeKind::Ellipse),
            "line" => Ok(ShapeKind::Line),
            "poly" | "polygon" => Ok(ShapeKind::Polygon),
            "text" | "label" => Ok(ShapeKind::Text),
            other => Err(DrawError::InvalidArgument(format!(
                "unknown shape kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An attribute that can be read and written by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    X,
    Y,
    Width,
    Height,
    Rotation,
    Fill,
    Outline,
    OutlineWidth,
    /// Polygon only
    Sides,
    /// Text only
    Text,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::X => "x",
            Attribute::Y => "y",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::Rotation => "rotation",
            Attribute::Fill => "fill",
            Attribute::Outline => "outline",
            Attribute::OutlineWidth => "outline_width",
            Attribute::Sides => "sides",
            Attribute::Text => "text",
        }
    }

    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::X,
            Attribute::Y,
            Attribute::Width,
            Attribute::Height,
            Attribute::Rotation,
            Attribute::Fill,
            Attribute::Outline,
            Attribute::OutlineWidth,
            Attribute::Sides,
            Attribute::Text,
        ]
    }

    pub fn applies_to(&self, kind: ShapeKind) -> bool {
        match self {
            Attribute::Sides => kind == ShapeKind::Polygon,
            Attribute::Text => kind == ShapeKind::Text,
            Attribute::Fill => kind != ShapeKind::Line,
            _ => true,
        }
    }

    /// Resolve an attribute name for a given shape kind.
    pub fn parse(name: &str, kind: ShapeKind) -> DrawResult<Attribute> {
        let wanted = name.to_ascii_lowercase().replace('-', "_");
        Attribute::all()
            .iter()
            .copied()
            .find(|attribute| attribute.name() == wanted || attribute.alias() == Some(wanted.as_str()))
            .filter(|attribute| attribute.applies_to(kind))
            .ok_or_else(|| DrawError::UnknownAttribute {
                attribute: name.to_string(),
                kind: kind.display_name().to_string(),
            })
    }

    fn alias(&self) -> Option<&'static str> {
        match self {
            Attribute::OutlineWidth => Some("stroke_width"),
            Attribute::Outline => Some("stroke"),
            Attribute::Rotation => Some("angle"),
            _ => None,
        }
    }

    /// Parse a raw console value into a typed value for this attribute.
    pub fn parse_value(&self, raw: &str) -> DrawResult<AttributeValue> {
        let invalid = |expected: &'static str| DrawError::InvalidValueFormat {
            attribute: self.name().to_string(),
            value: raw.to_string(),
            expected,
        };
        match self {
            Attribute::X | Attribute::Y | Attribute::Rotation => raw
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite())
                .map(AttributeValue::Number)
                .ok_or_else(|| invalid("a number")),
            Attribute::Width | Attribute::Height | Attribute::OutlineWidth => raw
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(AttributeValue::Number)
                .ok_or_else(|| invalid("a non-negative number")),
            Attribute::Sides => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 3)
                .map(AttributeValue::Count)
                .ok_or_else(|| invalid("a whole number of at least 3")),
            Attribute::Fill | Attribute::Outline => parse_color(raw)
                .map(AttributeValue::Color)
                .ok_or_else(|| invalid("a color name or hex code")),
            Attribute::Text => Ok(AttributeValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f32),
    Count(u32),
    Color(Color),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Count(n) => write!(f, "{}", n),
            AttributeValue::Color(color) if *color == Color::NONE => f.write_str("none"),
            AttributeValue::Color(color) => f.write_str(&color.to_srgba().to_hex()),
            AttributeValue::Text(text) => write!(f, "{:?}", text),
        }
    }
}

fn parse_color(raw: &str) -> Option<Color> {
    let named = match raw.to_ascii_lowercase().as_str() {
        "none" | "transparent" => Some(Color::NONE),
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        "red" => Some(Color::srgb(1.0, 0.0, 0.0)),
        "green" => Some(Color::srgb(0.0, 0.5, 0.0)),
        "blue" => Some(Color::srgb(0.0, 0.0, 1.0)),
        "yellow" => Some(Color::srgb(1.0, 1.0, 0.0)),
        "gray" | "grey" => Some(Color::srgb(0.5, 0.5, 0.5)),
        _ => None,
    };
    named.or_else(|| Srgba::hex(raw).ok().map(Color::from))
}

/// State of one drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub position: Vec2,
    pub size: Vec2,
    /// Degrees, counter-clockwise
    pub rotation: f32,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f32,
    pub sides: u32,
    pub text: String,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            size: Vec2::splat(100.0),
            rotation: 0.0,
            fill: if kind == ShapeKind::Line {
                Color::NONE
            } else {
                Color::WHITE
            },
            outline: Color::BLACK,
            outline_width: 1.0,
            sides: 6,
            text: String::new(),
        }
    }

    pub fn get(&self, attribute: Attribute) -> AttributeValue {
        match attribute {
            Attribute::X => AttributeValue::Number(self.position.x),
            Attribute::Y => AttributeValue::Number(self.position.y),
            Attribute::Width => AttributeValue::Number(self.size.x),
            Attribute::Height => AttributeValue::Number(self.size.y),
            Attribute::Rotation => AttributeValue::Number(self.rotation),
            Attribute::Fill => AttributeValue::Color(self.fill),
            Attribute::Outline => AttributeValue::Color(self.outline),
            Attribute::OutlineWidth => AttributeValue::Number(self.outline_width),
            Attribute::Sides => AttributeValue::Count(self.sides),
            Attribute::Text => AttributeValue::Text(self.text.clone()),
        }
    }

    /// Write a typed value. Returns the value it replaced.
    pub fn set(&mut self, attribute: Attribute, value: AttributeValue) -> DrawResult<AttributeValue> {
        let previous = self.get(attribute);
        match (attribute, value) {
            (Attribute::X, AttributeValue::Number(n)) => self.position.x = n,
            (Attribute::Y, AttributeValue::Number(n)) => self.position.y = n,
            (Attribute::Width, AttributeValue::Number(n)) => self.size.x = n,
            (Attribute::Height, AttributeValue::Number(n)) => self.size.y = n,
            (Attribute::Rotation, AttributeValue::Number(n)) => self.rotation = n,
            (Attribute::OutlineWidth, AttributeValue::Number(n)) => self.outline_width = n,
            (Attribute::Fill, AttributeValue::Color(c)) => self.fill = c,
            (Attribute::Outline, AttributeValue::Color(c)) => self.outline = c,
            (Attribute::Sides, AttributeValue::Count(n)) => self.sides = n,
            (Attribute::Text, AttributeValue::Text(t)) => self.text = t,
            (attribute, value) => {
                return Err(DrawError::InvalidValueFormat {
                    attribute: attribute.name().to_string(),
                    value: value.to_string(),
                    expected: "a value of the attribute's type",
                });
            }
        }
        Ok(previous)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Attribute names and current values, for display.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        Attribute::all()
            .iter()
            .filter(|attribute| attribute.applies_to(self.kind))
            .map(|attribute| (attribute.name(), self.get(*attribute).to_string()))
            .collect()
    }
}
