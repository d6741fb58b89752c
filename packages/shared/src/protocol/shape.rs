//! Shape records exchanged over the wire.
//!
//! Every shape carries an `id`, an anchor `(x, y)` and stroke/fill colors.
//! The color value `"default"` means "theme-dependent" and is resolved by the
//! renderer, never by the server.

use serde::{Deserialize, Serialize};

/// Color value that lets the renderer pick a theme-dependent color
pub const DEFAULT_COLOR: &str = "default";

/// A shape drawn on the board, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Circle(CircleShape),
    Rectangle(BoxShape),
    Triangle(BoxShape),
    Diamond(BoxShape),
    Path(PathShape),
}

/// Kind of a shape, without its geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Triangle,
    Diamond,
    Path,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Path => "path",
        }
    }
}

/// Circle anchored at its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleShape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub stroke_color: String,
    pub fill_color: String,
    pub radius: f64,
}

/// Shape described by a bounding box (rectangle, triangle, diamond)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxShape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub stroke_color: String,
    pub fill_color: String,
    pub width: f64,
    pub height: f64,
}

/// Free-hand stroke stored as SVG path data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathShape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub stroke_color: String,
    pub fill_color: String,
    /// SVG path data
    pub d: String,
}

impl Shape {
    pub fn id(&self) -> &str {
        match self {
            Shape::Circle(s) => &s.id,
            Shape::Rectangle(s) | Shape::Triangle(s) | Shape::Diamond(s) => &s.id,
            Shape::Path(s) => &s.id,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Diamond(_) => ShapeKind::Diamond,
            Shape::Path(_) => ShapeKind::Path,
        }
    }

    /// Anchor point of the shape
    pub fn position(&self) -> (f64, f64) {
        match self {
            Shape::Circle(s) => (s.x, s.y),
            Shape::Rectangle(s) | Shape::Triangle(s) | Shape::Diamond(s) => (s.x, s.y),
            Shape::Path(s) => (s.x, s.y),
        }
    }

    /// Returns a copy of this shape moved to a new anchor point
    pub fn moved_to(&self, x: f64, y: f64) -> Shape {
        let mut shape = self.clone();
        match &mut shape {
            Shape::Circle(s) => {
                s.x = x;
                s.y = y;
            }
            Shape::Rectangle(s) | Shape::Triangle(s) | Shape::Diamond(s) => {
                s.x = x;
                s.y = y;
            }
            Shape::Path(s) => {
                s.x = x;
                s.y = y;
            }
        }
        shape
    }
}
