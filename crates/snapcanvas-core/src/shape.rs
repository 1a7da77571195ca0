//! The rectangle shape and its identifiers.

use crate::style::ShapeStyle;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every generated shape id.
pub const ID_PREFIX: &str = "shape-";

/// Identifier of a shape, of the form `shape-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Id for the `n`th shape.
    pub fn from_index(n: u64) -> Self {
        Self(format!("{ID_PREFIX}{n}"))
    }

    /// Numeric suffix of the id, if it has one.
    ///
    /// Ids without the prefix or with a non-numeric suffix yield `None`.
    pub fn index(&self) -> Option<u64> {
        self.0.strip_prefix(ID_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A rectangle on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Logical x of the top-left corner.
    pub x: f64,
    /// Logical y of the top-left corner.
    pub y: f64,
    #[serde(default)]
    pub style: ShapeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Shape {
    /// Create a shape at a logical position.
    pub fn new(id: ShapeId, position: Point, style: ShapeStyle) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            style,
            text: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.style.width, self.style.height)
    }

    /// Logical bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Apply a shallow patch. Only fields present in the patch change.
    pub(crate) fn apply(&mut self, patch: ShapePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
    }
}

/// A shallow update for a shape.
///
/// `style` replaces the whole style object; callers start from the current
/// style when they only mean to change part of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub style: Option<ShapeStyle>,
    /// `Some(None)` clears the text.
    pub text: Option<Option<String>>,
}

impl ShapePatch {
    /// Patch that moves a shape.
    pub fn position(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Self::default()
        }
    }

    /// Patch that replaces the style.
    pub fn style(style: ShapeStyle) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Patch that sets or clears the text.
    pub fn text(text: Option<String>) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.style.is_none() && self.text.is_none()
    }
}
