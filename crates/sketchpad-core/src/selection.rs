//! Selection decorations and the resize handle system.

use crate::shapes::{Anchors, Shape};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Side length of the square resize handles, in local units.
pub const HANDLE_SIZE: f64 = 8.0;

/// Corner resize handles, listed in hit-test precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// All handles in the order they are hit-tested.
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    /// The corner of `rect` this handle sits on.
    pub fn corner_of(self, rect: Rect) -> Point {
        match self {
            ResizeHandle::TopLeft => Point::new(rect.x0, rect.y0),
            ResizeHandle::TopRight => Point::new(rect.x1, rect.y0),
            ResizeHandle::BottomLeft => Point::new(rect.x0, rect.y1),
            ResizeHandle::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }
}

/// A resize handle with its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Center of the handle in local coordinates.
    pub position: Point,
    pub kind: ResizeHandle,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: ResizeHandle) -> Self {
        Self { position, kind }
    }

    /// The square occupied by this handle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }

    /// Check if a point (in local coordinates) falls inside the handle square.
    pub fn hit_test(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}

/// Get the resize handles for a shape. Text shapes have none.
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    if !shape.kind().has_resize_handles() {
        return Vec::new();
    }
    let rect = shape.anchor_rect();
    ResizeHandle::ALL
        .iter()
        .map(|&kind| Handle::new(kind.corner_of(rect), kind))
        .collect()
}

/// Find which handle (if any) is hit at the given local point.
/// Overlapping handles resolve in `ResizeHandle::ALL` order.
pub fn hit_test_handles(shape: &Shape, point: Point) -> Option<ResizeHandle> {
    get_handles(shape)
        .into_iter()
        .find(|handle| handle.hit_test(point))
        .map(|handle| handle.kind)
}

/// Move the anchor components owned by `handle`.
///
/// Each corner moves only the coordinates it owns, which keeps the opposite
/// corner fixed. Anchors may cross; nothing is clamped.
pub fn apply_resize(anchors: &mut Anchors, handle: ResizeHandle, delta: Vec2) {
    match handle {
        ResizeHandle::TopLeft => {
            anchors.start += delta;
        }
        ResizeHandle::TopRight => {
            anchors.end.x += delta.x;
            anchors.start.y += delta.y;
        }
        ResizeHandle::BottomLeft => {
            anchors.start.x += delta.x;
            anchors.end.y += delta.y;
        }
        ResizeHandle::BottomRight => {
            anchors.end += delta;
        }
    }
}
