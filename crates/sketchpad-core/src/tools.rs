//! Editor modes and in-progress gesture state.

use crate::selection::ResizeHandle;
use crate::shapes::{Anchors, ShapeColor, ShapeId, ShapeKind, TextStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// What a pointer press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EditorMode {
    #[default]
    Select,
    CreateLine,
    CreateRect,
    CreateEllipse,
    CreateStar,
    CreateText,
}

impl EditorMode {
    /// The kind of shape a press creates, or `None` in select mode.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            EditorMode::Select => None,
            EditorMode::CreateLine => Some(ShapeKind::Line),
            EditorMode::CreateRect => Some(ShapeKind::Rectangle),
            EditorMode::CreateEllipse => Some(ShapeKind::Ellipse),
            EditorMode::CreateStar => Some(ShapeKind::Star),
            EditorMode::CreateText => Some(ShapeKind::Text),
        }
    }
}

/// State of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// Waiting for a press.
    #[default]
    Idle,
    /// A freshly added shape follows the pointer with its second anchor.
    Drawing { shape: ShapeId },
    /// A shape follows the pointer; nothing is recorded until release.
    Moving {
        shape: ShapeId,
        /// Position of the shape when the press happened.
        origin: Point,
        /// Pointer position of the press.
        press: Point,
    },
    /// One corner of a shape follows the pointer.
    Resizing {
        shape: ShapeId,
        handle: ResizeHandle,
        /// Pointer position of the previous event.
        last: Point,
        /// Anchors when the press happened.
        original: Anchors,
    },
    /// A new text shape is receiving its content.
    EditingText { shape: ShapeId },
    /// Marquee selection dragged out from empty space.
    Selecting {
        /// Starting point in scene coordinates.
        press: Point,
        /// Current pointer position.
        current: Point,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The shape the gesture is acting on.
    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            Gesture::Idle | Gesture::Selecting { .. } => None,
            Gesture::Drawing { shape }
            | Gesture::Moving { shape, .. }
            | Gesture::Resizing { shape, .. }
            | Gesture::EditingText { shape } => Some(*shape),
        }
    }

    /// The marquee rectangle, normalized, while selecting.
    pub fn selection_rect(&self) -> Option<Rect> {
        match self {
            Gesture::Selecting { press, current } => Some(Rect::from_points(*press, *current)),
            _ => None,
        }
    }
}

/// Ambient tool state: mode, style for new shapes and the active gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected mode.
    pub mode: EditorMode,
    /// Current state of the pointer interaction.
    pub gesture: Gesture,
    /// Stroke color applied to new shapes.
    pub current_color: ShapeColor,
    /// Font applied to new shapes.
    pub current_font: TextStyle,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the active gesture, leaving the manager idle.
    pub fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }
}
