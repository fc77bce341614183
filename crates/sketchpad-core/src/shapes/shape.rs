//! The shape entity shared by all five primitive kinds.

use super::{ShapeColor, ShapeId, ShapeTrait, TextStyle};
use crate::selection::{self, ResizeHandle};
use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use uuid::Uuid;

/// Slack added around the anchor rectangle for painting and coarse hit-testing.
pub const HIT_MARGIN: f64 = 10.0;

/// Number of outer points on a star.
const STAR_POINTS: usize = 5;

/// Path flattening tolerance.
const PATH_TOLERANCE: f64 = 0.1;

/// The closed set of drawable primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Star,
    Text,
}

impl ShapeKind {
    /// Get display name for UI.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Star => "Star",
            ShapeKind::Text => "Text",
        }
    }

    /// Text is sized by its content and cannot be resized by handles.
    pub fn has_resize_handles(&self) -> bool {
        !matches!(self, ShapeKind::Text)
    }
}

/// The two points that span a shape, in the order they were placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub start: Point,
    pub end: Point,
}

impl Anchors {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Both anchors at the same point.
    pub fn collapsed(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Normalized rectangle spanned by the anchors.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

/// A drawable shape.
///
/// Geometry lives in local coordinates spanned by two anchors; `position`
/// translates it into the scene. Shapes are allocated only by
/// [`ShapeCollection`](crate::collection::ShapeCollection), which keeps them
/// alive across undo and redo.
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) id: ShapeId,
    kind: ShapeKind,
    anchors: Anchors,
    position: Point,
    stroke_color: ShapeColor,
    text: String,
    text_style: TextStyle,
    selected: bool,
    editing: bool,
}

impl Shape {
    /// Create a zero-size shape anchored at `origin`.
    pub(crate) fn new(kind: ShapeKind, origin: Point, color: ShapeColor, font: TextStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            anchors: Anchors::collapsed(origin),
            position: Point::ZERO,
            stroke_color: color,
            text: String::new(),
            text_style: font,
            selected: false,
            editing: false,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    pub fn anchor_start(&self) -> Point {
        self.anchors.start
    }

    pub fn anchor_end(&self) -> Point {
        self.anchors.end
    }

    /// Translation of the shape in the scene.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn color(&self) -> ShapeColor {
        self.stroke_color
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Normalized anchor rectangle without the hit margin.
    pub fn anchor_rect(&self) -> Rect {
        self.anchors.rect()
    }

    /// Normalized anchor rectangle expanded by [`HIT_MARGIN`] on every side.
    pub fn bounding_region(&self) -> Rect {
        self.anchor_rect().inflate(HIT_MARGIN, HIT_MARGIN)
    }

    /// Bounding region translated into scene coordinates.
    pub fn scene_bounds(&self) -> Rect {
        self.bounding_region() + self.position.to_vec2()
    }

    /// Convert a scene point into this shape's local coordinates.
    pub fn to_local(&self, point: Point) -> Point {
        point - self.position.to_vec2()
    }

    /// Update the second anchor while the shape is being drawn.
    pub fn set_end_anchor(&mut self, point: Point) {
        self.anchors.end = point;
    }

    pub fn set_anchors(&mut self, anchors: Anchors) {
        self.anchors = anchors;
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Find the resize handle under a local point. Always `None` for text.
    pub fn resize_handle_at(&self, point: Point) -> Option<ResizeHandle> {
        selection::hit_test_handles(self, point)
    }

    /// Drag one corner by `delta`, keeping the opposite corner in place.
    pub fn apply_resize_delta(&mut self, handle: ResizeHandle, delta: Vec2) {
        selection::apply_resize(&mut self.anchors, handle, delta);
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.stroke_color = color;
    }

    pub fn set_font(&mut self, font: TextStyle) {
        self.text_style = font;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    /// Five-pointed star inscribed in the bounding region.
    fn star_path(&self) -> BezPath {
        let region = self.bounding_region();
        let center = region.center();
        let outer = region.width().min(region.height()) / 2.0;
        let mut path = BezPath::new();
        for i in 0..STAR_POINTS * 2 {
            let angle = PI / STAR_POINTS as f64 * i as f64 - FRAC_PI_2;
            let radius = if i % 2 == 0 { outer } else { outer / 2.0 };
            let vertex = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            if i == 0 {
                path.move_to(vertex);
            } else {
                path.line_to(vertex);
            }
        }
        path.close_path();
        path
    }
}

impl ShapeTrait for Shape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounding_region()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.scene_bounds().contains(point)
    }

    fn to_path(&self) -> BezPath {
        match self.kind {
            ShapeKind::Line => {
                Line::new(self.anchors.start, self.anchors.end).to_path(PATH_TOLERANCE)
            }
            ShapeKind::Rectangle => self.bounding_region().to_path(PATH_TOLERANCE),
            ShapeKind::Ellipse => {
                Ellipse::from_rect(self.bounding_region()).to_path(PATH_TOLERANCE)
            }
            ShapeKind::Star => self.star_path(),
            // Glyph layout belongs to the renderer.
            ShapeKind::Text => BezPath::new(),
        }
    }
}
