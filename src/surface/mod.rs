//! The drawing collaborator: everything that puts shapes on the canvas.
//!
//! The thought model only ever talks to [`Surface`]. The terminal front end
//! paints a [`scene::Scene`], which also owns hit testing and dragging.

pub mod scene;

use std::fmt;

use ratatui::style::Color;
use thiserror::Error;

use crate::thought::model::ThoughtId;

/// A position on the canvas. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a text shape is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Thought labels: bold.
    Label,
}

/// The logical connectives an arrow can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKind {
    /// `p -> q`
    Implies,
    /// `p <-> q`
    Iff,
    /// `p -/-> q`
    NotImplies,
}

/// Drawing attributes for one arrow kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowStyle {
    /// Draw a head at the start of the arrow as well as at the end.
    pub double_headed: bool,
    /// Strike the middle of the shaft.
    pub negated: bool,
    pub color: Color,
}

impl ArrowKind {
    pub const ALL: [ArrowKind; 3] = [Self::Implies, Self::Iff, Self::NotImplies];

    /// Button caption for this kind in the create form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Implies => "Implication",
            Self::Iff => "Iff",
            Self::NotImplies => "Not implies",
        }
    }

    pub fn style(self) -> ArrowStyle {
        match self {
            Self::Implies => ArrowStyle {
                double_headed: false,
                negated: false,
                color: Color::Cyan,
            },
            Self::Iff => ArrowStyle {
                double_headed: true,
                negated: false,
                color: Color::Green,
            },
            Self::NotImplies => ArrowStyle {
                double_headed: false,
                negated: true,
                color: Color::LightRed,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("the canvas is full ({limit} shapes)")]
    Full { limit: usize },
    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),
    #[error("cannot attach {child} to {parent}")]
    InvalidAttachment { parent: ShapeId, child: ShapeId },
}

/// Primitive drawing operations the thought model depends on.
pub trait Surface {
    /// A filled circle centred on `center`.
    fn circle(&mut self, center: Point, radius: f64) -> Result<ShapeId, SurfaceError>;

    /// A text label centred on `at`.
    fn text(&mut self, at: Point, text: &str, style: TextStyle) -> Result<ShapeId, SurfaceError>;

    fn arrow(&mut self, from: Point, to: Point, kind: ArrowKind) -> Result<ShapeId, SurfaceError>;

    /// Make `child` move and disappear together with `parent`.
    fn attach(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), SurfaceError>;

    /// Route clicks on `shape` to `thought`.
    fn on_click(&mut self, shape: ShapeId, thought: ThoughtId) -> Result<(), SurfaceError>;

    /// Remove `shape` and everything attached to it.
    fn remove(&mut self, shape: ShapeId) -> Result<(), SurfaceError>;
}
