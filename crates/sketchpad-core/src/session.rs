//! Editor session: turns pointer gestures and intents into commands.

use crate::collection::{CollectionChange, ShapeCollection};
use crate::config::EditorConfig;
use crate::history::{Command, CommandStack};
use crate::input::Intent;
use crate::selection::ResizeHandle;
use crate::shapes::{Shape, ShapeColor, ShapeId, ShapeKind, ShapeTrait, TextStyle};
use crate::tools::{EditorMode, Gesture, ToolManager};
use kurbo::{Point, Rect};

/// A marquee must be at least this large in both dimensions to select.
const MIN_MARQUEE_SIZE: f64 = 2.0;

/// An editing session over one shape collection.
///
/// Transient feedback (drawing, dragging, resizing) mutates shapes directly;
/// a command is recorded only when the gesture ends with an actual change.
/// Marquee selection never records anything.
#[derive(Debug, Default)]
pub struct EditorSession {
    collection: ShapeCollection,
    history: CommandStack,
    tools: ToolManager,
}

impl EditorSession {
    /// Create a session with default settings and unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a validated configuration.
    pub fn with_config(config: &EditorConfig) -> Self {
        let tools = ToolManager {
            mode: config.initial_mode,
            current_color: config.default_color,
            current_font: config.default_font.clone(),
            ..ToolManager::default()
        };
        Self {
            collection: ShapeCollection::new(),
            history: CommandStack::with_limit(config.history_limit),
            tools,
        }
    }

    /// Register a callback for every collection change.
    pub fn on_collection_changed(&mut self, listener: impl FnMut(&CollectionChange) + 'static) {
        self.collection.subscribe(listener);
    }

    // --- Ambient tool state ---

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.complete_gesture();
        log::debug!("Mode {:?}", mode);
        self.tools.mode = mode;
    }

    /// Set the stroke color for shapes created from now on.
    pub fn set_color(&mut self, color: ShapeColor) {
        self.tools.current_color = color;
    }

    /// Set the font for text created from now on.
    pub fn set_font(&mut self, font: TextStyle) {
        self.tools.current_font = font;
    }

    // --- Pointer gestures ---

    /// Begin a gesture at a scene position.
    pub fn pointer_down(&mut self, point: Point) {
        self.complete_gesture();
        match self.tools.mode.shape_kind() {
            None => self.begin_select(point),
            Some(ShapeKind::Text) => self.begin_text(point),
            Some(kind) => self.begin_drawing(kind, point),
        }
    }

    /// Continue the active gesture.
    pub fn pointer_move(&mut self, point: Point) {
        match self.tools.gesture {
            Gesture::Drawing { shape } => {
                self.collection.update(shape, |s| {
                    let local = s.to_local(point);
                    s.set_end_anchor(local);
                });
            }
            Gesture::Moving { shape, origin, press } => {
                self.collection
                    .update(shape, |s| s.set_position(origin + (point - press)));
            }
            Gesture::Resizing {
                shape,
                handle,
                last,
                original,
            } => {
                self.collection
                    .update(shape, |s| s.apply_resize_delta(handle, point - last));
                self.tools.gesture = Gesture::Resizing {
                    shape,
                    handle,
                    last: point,
                    original,
                };
            }
            Gesture::Selecting { press, .. } => {
                self.tools.gesture = Gesture::Selecting {
                    press,
                    current: point,
                };
            }
            Gesture::Idle | Gesture::EditingText { .. } => {}
        }
    }

    /// End the active pointer gesture. A text edit stays open.
    pub fn pointer_up(&mut self) {
        if !matches!(self.tools.gesture, Gesture::EditingText { .. }) {
            self.complete_gesture();
        }
    }

    /// Abandon the active gesture, leaving no trace in history.
    /// With no gesture active this clears the selection.
    pub fn cancel(&mut self) {
        match self.tools.take_gesture() {
            Gesture::Idle => self.clear_selection(),
            Gesture::Selecting { .. } => {}
            Gesture::Drawing { shape } | Gesture::EditingText { shape } => {
                self.roll_back_creation(shape);
            }
            Gesture::Moving { shape, origin, .. } => {
                self.collection.update(shape, |s| s.set_position(origin));
            }
            Gesture::Resizing { shape, original, .. } => {
                self.collection.update(shape, |s| s.set_anchors(original));
            }
        }
    }

    fn begin_select(&mut self, point: Point) {
        if let Some((shape, handle)) = self.handle_at(point) {
            if let Some(original) = self.collection.get(shape).map(Shape::anchors) {
                self.tools.gesture = Gesture::Resizing {
                    shape,
                    handle,
                    last: point,
                    original,
                };
            }
            return;
        }

        let Some(shape) = self.collection.shape_at(point) else {
            self.clear_selection();
            self.tools.gesture = Gesture::Selecting {
                press: point,
                current: point,
            };
            return;
        };
        if !self.is_selected(shape) {
            self.select(shape);
        }
        if let Some(origin) = self.collection.get(shape).map(Shape::position) {
            self.tools.gesture = Gesture::Moving {
                shape,
                origin,
                press: point,
            };
        }
    }

    /// Topmost selected shape with a resize handle under a scene point.
    fn handle_at(&self, point: Point) -> Option<(ShapeId, ResizeHandle)> {
        self.collection
            .shapes()
            .iter()
            .rev()
            .filter_map(|&id| self.collection.get(id))
            .filter(|s| s.is_selected())
            .find_map(|s| s.resize_handle_at(s.to_local(point)).map(|handle| (s.id(), handle)))
    }

    fn begin_drawing(&mut self, kind: ShapeKind, point: Point) {
        if let Some(shape) = self.push_add(kind, point) {
            self.tools.gesture = Gesture::Drawing { shape };
        }
    }

    fn begin_text(&mut self, point: Point) {
        let Some(shape) = self.push_add(ShapeKind::Text, point) else {
            return;
        };
        self.clear_selection();
        self.collection.update(shape, |s| {
            s.set_selected(true);
            s.set_editing(true);
        });
        self.tools.gesture = Gesture::EditingText { shape };
    }

    fn push_add(&mut self, kind: ShapeKind, point: Point) -> Option<ShapeId> {
        let command = Command::add_shape(
            kind,
            point,
            self.tools.current_color,
            self.tools.current_font.clone(),
        );
        self.history.push(command, &mut self.collection).created_shape()
    }

    /// Finish the active gesture, recording what it changed.
    fn complete_gesture(&mut self) {
        match self.tools.take_gesture() {
            Gesture::Idle | Gesture::Drawing { .. } => {}
            Gesture::Moving { shape, origin, .. } => {
                let Some(to) = self.collection.get(shape).map(Shape::position) else {
                    return;
                };
                if to != origin {
                    let command = Command::MoveShape {
                        shape,
                        from: origin,
                        to,
                    };
                    self.history.push(command, &mut self.collection);
                }
            }
            Gesture::Resizing {
                shape, original, ..
            } => {
                let Some(to) = self.collection.get(shape).map(Shape::anchors) else {
                    return;
                };
                if to != original {
                    let command = Command::ResizeShape {
                        shape,
                        from: original,
                        to,
                    };
                    self.history.push(command, &mut self.collection);
                }
            }
            Gesture::EditingText { shape } => self.end_text_edit(shape),
            Gesture::Selecting { press, current } => {
                let rect = Rect::from_points(press, current);
                if rect.width() > MIN_MARQUEE_SIZE && rect.height() > MIN_MARQUEE_SIZE {
                    for shape in self.collection.shapes_in_rect(rect) {
                        self.add_to_selection(shape);
                    }
                }
            }
        }
    }

    /// Undo a shape created by the active gesture.
    ///
    /// If other commands were pushed on top of the creation in the meantime,
    /// the shape is removed with a regular command instead.
    fn roll_back_creation(&mut self, shape: ShapeId) {
        let on_top = !self.history.can_redo()
            && self.history.applied().last().and_then(Command::created_shape) == Some(shape);
        if on_top {
            self.history.rollback(&mut self.collection);
        } else if self.collection.contains(shape) {
            self.history
                .push(Command::remove_shape(shape), &mut self.collection);
        }
    }

    // --- Text editing ---

    /// Replace the content of the text being edited.
    pub fn edit_text(&mut self, text: impl Into<String>) {
        let Gesture::EditingText { shape } = self.tools.gesture else {
            log::debug!("Ignoring text edit with no text being edited");
            return;
        };
        let text = text.into();
        self.collection.update(shape, |s| s.set_text(text));
    }

    /// Close the text edit. Text left empty is removed again.
    pub fn finish_text_edit(&mut self) {
        if let Gesture::EditingText { shape } = self.tools.gesture {
            self.tools.take_gesture();
            self.end_text_edit(shape);
        }
    }

    fn end_text_edit(&mut self, shape: ShapeId) {
        let empty = self.collection.get(shape).is_none_or(|s| s.text().is_empty());
        if empty {
            self.roll_back_creation(shape);
        } else {
            self.collection.update(shape, |s| s.set_editing(false));
        }
    }

    // --- Selection-based edits ---

    /// Remove every selected shape, one command per shape.
    pub fn delete_selection(&mut self) {
        self.complete_gesture();
        for shape in self.collection.selected_ids() {
            self.history
                .push(Command::remove_shape(shape), &mut self.collection);
        }
    }

    /// Recolor every selected shape, one command per shape.
    pub fn recolor_selection(&mut self, color: ShapeColor) {
        for shape in self.collection.selected_ids() {
            let Some(from) = self.collection.get(shape).map(Shape::color) else {
                continue;
            };
            let command = Command::RecolorShape {
                shape,
                from,
                to: color,
            };
            self.history.push(command, &mut self.collection);
        }
    }

    /// Apply a font to every selected text shape, one command per shape.
    pub fn restyle_selected_text(&mut self, font: TextStyle) {
        for shape in self.collection.selected_ids() {
            let Some(from) = self
                .collection
                .get(shape)
                .filter(|s| s.kind() == ShapeKind::Text)
                .map(|s| s.font().clone())
            else {
                continue;
            };
            let command = Command::RestyleText {
                shape,
                from,
                to: font.clone(),
            };
            self.history.push(command, &mut self.collection);
        }
    }

    /// Remove every shape with a single undoable command.
    pub fn clear_all(&mut self) {
        self.complete_gesture();
        let shapes = self.collection.shapes().to_vec();
        if shapes.is_empty() {
            return;
        }
        self.history
            .push(Command::ClearAll { shapes }, &mut self.collection);
    }

    // --- History ---

    /// Undo one step. An empty text still being edited counts as that step:
    /// its creation is rolled back and nothing else is undone.
    pub fn undo(&mut self) -> bool {
        if let Gesture::EditingText { shape } = self.tools.gesture {
            let empty = self.collection.get(shape).is_none_or(|s| s.text().is_empty());
            if empty {
                self.tools.take_gesture();
                self.roll_back_creation(shape);
                return true;
            }
        }
        self.complete_gesture();
        self.history.undo(&mut self.collection)
    }

    pub fn redo(&mut self) -> bool {
        self.complete_gesture();
        self.history.redo(&mut self.collection)
    }

    /// Forget all recorded commands. Shapes only reachable through them are freed.
    pub fn clear_history(&mut self) {
        self.complete_gesture();
        self.history.clear(&mut self.collection);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Selection ---

    /// Select a single shape, deselecting everything else.
    pub fn select(&mut self, id: ShapeId) {
        self.clear_selection();
        self.add_to_selection(id);
    }

    /// Add a shape to the selection.
    pub fn add_to_selection(&mut self, id: ShapeId) {
        if !self.collection.contains(id) {
            log::debug!("Ignoring selection of absent shape {}", id);
            return;
        }
        if !self.is_selected(id) {
            self.collection.update(id, |s| s.set_selected(true));
        }
    }

    pub fn clear_selection(&mut self) {
        for id in self.collection.selected_ids() {
            self.collection.update(id, |s| s.set_selected(false));
        }
    }

    pub fn select_all(&mut self) {
        for id in self.collection.shapes().to_vec() {
            self.add_to_selection(id);
        }
    }

    /// Selected shapes in paint order.
    pub fn selection(&self) -> Vec<ShapeId> {
        self.collection.selected_ids()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.collection
            .get(id)
            .is_some_and(|s| s.is_selected() && self.collection.contains(id))
    }

    // --- Queries ---

    /// Present shapes, back to front.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.collection.iter()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.collection.get(id)
    }

    pub fn current_color(&self) -> ShapeColor {
        self.tools.current_color
    }

    pub fn current_font(&self) -> &TextStyle {
        &self.tools.current_font
    }

    pub fn mode(&self) -> EditorMode {
        self.tools.mode
    }

    pub fn gesture(&self) -> Gesture {
        self.tools.gesture
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn collection(&self) -> &ShapeCollection {
        &self.collection
    }

    /// Route an intent to the matching operation.
    pub fn dispatch(&mut self, intent: Intent) {
        log::trace!("Dispatching {:?}", intent);
        match intent {
            Intent::SetMode { mode } => self.set_mode(mode),
            Intent::SetColor { color } => self.set_color(color),
            Intent::SetFont { font } => self.set_font(font),
            Intent::PointerDown { position } => self.pointer_down(position),
            Intent::PointerMove { position } => self.pointer_move(position),
            Intent::PointerUp => self.pointer_up(),
            Intent::Cancel => self.cancel(),
            Intent::DeleteSelection => self.delete_selection(),
            Intent::ClearAll => self.clear_all(),
            Intent::Undo => {
                self.undo();
            }
            Intent::Redo => {
                self.redo();
            }
            Intent::RecolorSelection { color } => self.recolor_selection(color),
            Intent::RestyleSelectedText { font } => self.restyle_selected_text(font),
            Intent::EditText { text } => self.edit_text(text),
            Intent::FinishTextEdit => self.finish_text_edit(),
            Intent::SelectAll => self.select_all(),
            Intent::ClearSelection => self.clear_selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::FontWeight;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn drag(session: &mut EditorSession, from: (f64, f64), to: (f64, f64)) {
        session.pointer_down(Point::new(from.0, from.1));
        session.pointer_move(Point::new(to.0, to.1));
        session.pointer_up();
    }

    fn draw(
        session: &mut EditorSession,
        mode: EditorMode,
        from: (f64, f64),
        to: (f64, f64),
    ) -> ShapeId {
        session.set_mode(mode);
        drag(session, from, to);
        *session.collection().shapes().last().unwrap()
    }

    fn assert_rect(rect: Rect, x0: f64, y0: f64, x1: f64, y1: f64) {
        assert!((rect.x0 - x0).abs() < f64::EPSILON, "x0 {} != {}", rect.x0, x0);
        assert!((rect.y0 - y0).abs() < f64::EPSILON, "y0 {} != {}", rect.y0, y0);
        assert!((rect.x1 - x1).abs() < f64::EPSILON, "x1 {} != {}", rect.x1, x1);
        assert!((rect.y1 - y1).abs() < f64::EPSILON, "y1 {} != {}", rect.y1, y1);
    }

    #[test]
    fn test_draw_rectangle_then_undo_redo() {
        let mut session = EditorSession::new();
        let first = draw(&mut session, EditorMode::CreateEllipse, (300.0, 300.0), (350.0, 350.0));
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 50.0));

        let shape = session.shape(id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        let region = shape.bounding_region();
        assert_rect(region, -10.0, -10.0, 110.0, 60.0);
        assert!((region.width() - 120.0).abs() < f64::EPSILON);
        assert!((region.height() - 70.0).abs() < f64::EPSILON);
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert_eq!(session.collection().shapes(), &[first]);

        assert!(session.redo());
        assert_eq!(session.collection().shapes(), &[first, id]);
        assert_rect(session.shape(id).unwrap().bounding_region(), -10.0, -10.0, 110.0, 60.0);
    }

    #[test]
    fn test_drawing_records_only_the_add() {
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::CreateLine);
        session.pointer_down(Point::new(10.0, 10.0));
        session.pointer_move(Point::new(20.0, 20.0));
        session.pointer_move(Point::new(40.0, 30.0));
        session.pointer_up();
        assert_eq!(session.history().len(), 1);
        let shape = session.shapes().next().unwrap();
        assert_eq!(shape.anchor_start(), Point::new(10.0, 10.0));
        assert_eq!(shape.anchor_end(), Point::new(40.0, 30.0));
        assert_eq!(shape.color(), ShapeColor::black());
    }

    #[test]
    fn test_new_shapes_use_current_style() {
        let mut session = EditorSession::new();
        session.set_color(ShapeColor::blue());
        session.set_font(TextStyle::new("Serif", 20.0));
        let id = draw(&mut session, EditorMode::CreateStar, (0.0, 0.0), (40.0, 40.0));
        let shape = session.shape(id).unwrap();
        assert_eq!(shape.color(), ShapeColor::blue());
        assert_eq!(shape.font().family, "Serif");
    }

    #[test]
    fn test_recolor_two_selected_shapes() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        let b = draw(&mut session, EditorMode::CreateEllipse, (100.0, 100.0), (150.0, 150.0));
        session.select_all();
        assert_eq!(session.selection(), vec![a, b]);

        let before = session.history().len();
        session.recolor_selection(ShapeColor::red());
        assert_eq!(session.history().len(), before + 2);
        assert!(
            session.history().applied()[before..]
                .iter()
                .all(|c| matches!(c, Command::RecolorShape { .. }))
        );

        assert!(session.undo());
        assert_eq!(session.shape(a).unwrap().color(), ShapeColor::red());
        assert_eq!(session.shape(b).unwrap().color(), ShapeColor::black());
    }

    #[test]
    fn test_recolor_pushes_even_when_color_is_unchanged() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        session.select(a);
        session.recolor_selection(ShapeColor::black());
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_clear_all_then_undo_restores_order() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (10.0, 10.0));
        let b = draw(&mut session, EditorMode::CreateLine, (20.0, 20.0), (30.0, 30.0));
        let c = draw(&mut session, EditorMode::CreateStar, (40.0, 40.0), (50.0, 50.0));
        session.clear_history();

        session.clear_all();
        assert!(session.collection().is_empty());
        assert!(session.undo());
        assert_eq!(session.collection().shapes(), &[a, b, c]);
        assert!(!session.undo());
        assert_eq!(session.collection().shapes(), &[a, b, c]);
    }

    #[test]
    fn test_clear_all_on_empty_pushes_nothing() {
        let mut session = EditorSession::new();
        session.clear_all();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_move_selected_shape() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 100.0));
        session.set_mode(EditorMode::Select);

        drag(&mut session, (50.0, 50.0), (80.0, 60.0));
        assert!(session.is_selected(id));
        assert_eq!(session.shape(id).unwrap().position(), Point::new(30.0, 10.0));
        assert!(matches!(
            session.history().applied().last(),
            Some(Command::MoveShape { .. })
        ));

        assert!(session.undo());
        assert_eq!(session.shape(id).unwrap().position(), Point::ZERO);
        assert!(session.redo());
        assert_eq!(session.shape(id).unwrap().position(), Point::new(30.0, 10.0));
    }

    #[test]
    fn test_click_without_drag_records_nothing() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 100.0));
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(50.0, 50.0));
        session.pointer_up();
        assert!(session.is_selected(id));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_click_empty_space_clears_selection() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 100.0));
        session.select(id);
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(500.0, 500.0));
        session.pointer_up();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_press_selects_topmost() {
        let mut session = EditorSession::new();
        let below = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 100.0));
        let above = draw(&mut session, EditorMode::CreateRect, (50.0, 50.0), (150.0, 150.0));
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(75.0, 75.0));
        session.pointer_up();
        assert_eq!(session.selection(), vec![above]);
        assert!(!session.is_selected(below));
    }

    #[test]
    fn test_resize_through_handle() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 50.0));
        session.set_mode(EditorMode::Select);
        session.select(id);

        session.pointer_down(Point::new(100.0, 50.0));
        assert!(matches!(
            session.gesture(),
            Gesture::Resizing {
                handle: ResizeHandle::BottomRight,
                ..
            }
        ));
        session.pointer_move(Point::new(110.0, 55.0));
        session.pointer_move(Point::new(120.0, 70.0));
        session.pointer_up();

        let shape = session.shape(id).unwrap();
        assert_eq!(shape.anchor_end(), Point::new(120.0, 70.0));
        assert_eq!(shape.position(), Point::ZERO);
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert_eq!(session.shape(id).unwrap().anchor_end(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_handles_ignored_when_not_selected() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 50.0));
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(100.0, 50.0));
        assert!(matches!(session.gesture(), Gesture::Moving { shape, .. } if shape == id));
        session.pointer_up();
    }

    #[test]
    fn test_resize_after_move_uses_local_coordinates() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 50.0));
        session.set_mode(EditorMode::Select);
        drag(&mut session, (50.0, 25.0), (250.0, 225.0));
        assert_eq!(session.shape(id).unwrap().position(), Point::new(200.0, 200.0));

        session.pointer_down(Point::new(200.0, 200.0));
        assert!(matches!(
            session.gesture(),
            Gesture::Resizing {
                handle: ResizeHandle::TopLeft,
                ..
            }
        ));
        session.pointer_move(Point::new(190.0, 195.0));
        session.pointer_up();
        assert_eq!(session.shape(id).unwrap().anchor_start(), Point::new(-10.0, -5.0));
    }

    #[test]
    fn test_cancel_drawing_rolls_back() {
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::CreateEllipse);
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(40.0, 40.0));
        let id = session.gesture().shape().unwrap();
        session.cancel();
        assert!(session.gesture().is_idle());
        assert!(session.collection().is_empty());
        assert!(session.history().is_empty());
        assert!(!session.collection().is_allocated(id));
    }

    #[test]
    fn test_cancel_move_restores_position() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 100.0));
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(50.0, 50.0));
        session.pointer_move(Point::new(90.0, 90.0));
        session.cancel();
        session.pointer_up();
        assert_eq!(session.shape(id).unwrap().position(), Point::ZERO);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_undo_during_move_commits_it_first() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (100.0, 100.0));
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(50.0, 50.0));
        session.pointer_move(Point::new(60.0, 50.0));
        assert!(session.undo());
        assert_eq!(session.shape(id).unwrap().position(), Point::ZERO);
        assert!(session.collection().contains(id));
        assert!(session.can_redo());
    }

    #[test]
    fn test_text_creation() {
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::CreateText);
        session.pointer_down(Point::new(20.0, 20.0));
        session.pointer_up();
        let id = session.gesture().shape().unwrap();
        assert!(session.shape(id).unwrap().is_editing());
        assert!(session.is_selected(id));

        session.edit_text("hello");
        session.finish_text_edit();
        let shape = session.shape(id).unwrap();
        assert_eq!(shape.text(), "hello");
        assert!(!shape.is_editing());
        assert!(session.gesture().is_idle());
        assert_eq!(session.history().len(), 1);

        assert!(session.undo());
        assert!(session.redo());
        assert_eq!(session.shape(id).unwrap().text(), "hello");
    }

    #[test]
    fn test_empty_text_is_rolled_back() {
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::CreateText);
        session.pointer_down(Point::new(20.0, 20.0));
        session.pointer_up();
        session.finish_text_edit();
        assert!(session.collection().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(session.collection().allocated(), 0);
    }

    #[test]
    fn test_empty_text_after_other_command_is_removed() {
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::CreateText);
        session.pointer_down(Point::new(20.0, 20.0));
        session.recolor_selection(ShapeColor::red());
        session.finish_text_edit();
        assert!(session.collection().is_empty());
        assert!(matches!(
            session.history().applied().last(),
            Some(Command::RemoveShape { .. })
        ));
    }

    #[test]
    fn test_restyle_only_touches_text() {
        let mut session = EditorSession::new();
        let rect = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        session.set_mode(EditorMode::CreateText);
        session.pointer_down(Point::new(100.0, 100.0));
        session.edit_text("label");
        session.finish_text_edit();
        let text = *session.collection().shapes().last().unwrap();

        session.select_all();
        let before = session.history().len();
        let bold = TextStyle::new("Serif", 24.0).with_weight(FontWeight::Heavy);
        session.restyle_selected_text(bold.clone());
        assert_eq!(session.history().len(), before + 1);
        assert_eq!(session.shape(text).unwrap().font(), &bold);
        assert_eq!(session.shape(rect).unwrap().font(), &TextStyle::default());

        session.undo();
        assert_eq!(session.shape(text).unwrap().font(), &TextStyle::default());
    }

    #[test]
    fn test_delete_selection_one_command_each() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        let b = draw(&mut session, EditorMode::CreateRect, (100.0, 0.0), (150.0, 50.0));
        let c = draw(&mut session, EditorMode::CreateRect, (200.0, 0.0), (250.0, 50.0));
        session.select(a);
        session.add_to_selection(c);
        session.delete_selection();
        assert_eq!(session.collection().shapes(), &[b]);
        assert_eq!(session.history().len(), 5);

        session.undo();
        session.undo();
        assert_eq!(session.collection().shapes(), &[a, b, c]);
    }

    #[test]
    fn test_push_after_undo_frees_abandoned_shape() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        session.undo();
        assert!(session.collection().is_allocated(a));
        draw(&mut session, EditorMode::CreateRect, (10.0, 10.0), (20.0, 20.0));
        assert!(!session.collection().is_allocated(a));
        assert!(!session.can_redo());
    }

    #[test]
    fn test_with_config() {
        let config = EditorConfig {
            default_color: ShapeColor::red(),
            history_limit: Some(2),
            initial_mode: EditorMode::CreateLine,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::with_config(&config);
        assert_eq!(session.mode(), EditorMode::CreateLine);
        assert_eq!(session.current_color(), ShapeColor::red());

        for i in 0..4 {
            let offset = f64::from(i) * 10.0;
            drag(&mut session, (offset, 0.0), (offset + 5.0, 5.0));
        }
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.collection().len(), 4);
    }

    #[test]
    fn test_dispatch_routes_intents() {
        let mut session = EditorSession::new();
        let intents = vec![
            Intent::SetMode {
                mode: EditorMode::CreateRect,
            },
            Intent::PointerDown {
                position: Point::new(0.0, 0.0),
            },
            Intent::PointerMove {
                position: Point::new(20.0, 20.0),
            },
            Intent::PointerUp,
            Intent::SelectAll,
            Intent::RecolorSelection {
                color: ShapeColor::blue(),
            },
            Intent::Undo,
        ];
        for intent in intents {
            session.dispatch(intent);
        }
        let shape = session.shapes().next().unwrap();
        assert_eq!(shape.color(), ShapeColor::black());
        assert!(session.can_redo());

        session.dispatch(Intent::Redo);
        assert_eq!(session.shapes().next().unwrap().color(), ShapeColor::blue());
        session.dispatch(Intent::DeleteSelection);
        assert!(session.collection().is_empty());
    }

    #[test]
    fn test_change_notifications() {
        let mut session = EditorSession::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        session.on_collection_changed(move |change| sink.borrow_mut().push(*change));

        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (10.0, 10.0));
        session.undo();
        let changes = log.borrow();
        assert_eq!(changes.first(), Some(&CollectionChange::Inserted(id)));
        assert!(changes.contains(&CollectionChange::Updated(id)));
        assert_eq!(changes.last(), Some(&CollectionChange::Detached(id)));
    }

    #[test]
    fn test_escape_when_idle_clears_selection() {
        let mut session = EditorSession::new();
        let id = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (10.0, 10.0));
        session.select(id);
        session.cancel();
        assert!(session.selection().is_empty());
        assert!(session.collection().contains(id));
    }

    #[test]
    fn test_undo_while_editing_empty_text_takes_one_step() {
        let mut session = EditorSession::new();
        let rect = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        session.set_mode(EditorMode::CreateText);
        session.pointer_down(Point::new(200.0, 200.0));
        session.pointer_up();
        assert_eq!(session.collection().len(), 2);

        assert!(session.undo());
        assert!(session.gesture().is_idle());
        assert_eq!(session.collection().shapes(), &[rect]);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().cursor(), 1);
        assert!(!session.can_redo());

        assert!(session.undo());
        assert!(session.collection().is_empty());
    }

    #[test]
    fn test_undo_while_editing_text_with_content_commits_it() {
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::CreateText);
        session.pointer_down(Point::new(20.0, 20.0));
        session.edit_text("note");
        let id = session.gesture().shape().unwrap();

        assert!(session.undo());
        assert!(session.collection().is_empty());
        assert!(session.redo());
        assert_eq!(session.shape(id).unwrap().text(), "note");
        assert!(!session.shape(id).unwrap().is_editing());
    }

    #[test]
    fn test_marquee_selects_overlapping_shapes() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        let b = draw(&mut session, EditorMode::CreateEllipse, (100.0, 0.0), (150.0, 50.0));
        let c = draw(&mut session, EditorMode::CreateStar, (400.0, 400.0), (450.0, 450.0));
        session.set_mode(EditorMode::Select);

        session.pointer_down(Point::new(-30.0, 200.0));
        session.pointer_move(Point::new(120.0, 20.0));
        assert_eq!(
            session.gesture().selection_rect(),
            Some(Rect::new(-30.0, 20.0, 120.0, 200.0))
        );
        session.pointer_up();
        assert!(session.gesture().is_idle());
        assert_eq!(session.selection(), vec![a, b]);
        assert!(!session.is_selected(c));
        assert_eq!(session.history().len(), 3);

        session.recolor_selection(ShapeColor::red());
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.shape(c).unwrap().color(), ShapeColor::black());
    }

    #[test]
    fn test_marquee_replaces_previous_selection() {
        let mut session = EditorSession::new();
        let a = draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        let b = draw(&mut session, EditorMode::CreateRect, (300.0, 0.0), (350.0, 50.0));
        session.set_mode(EditorMode::Select);
        session.select(a);

        drag(&mut session, (280.0, 100.0), (320.0, -20.0));
        assert_eq!(session.selection(), vec![b]);
    }

    #[test]
    fn test_tiny_marquee_selects_nothing() {
        let mut session = EditorSession::new();
        draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        session.set_mode(EditorMode::Select);
        drag(&mut session, (70.0, 70.0), (59.0, 71.0));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_cancel_marquee_selects_nothing() {
        let mut session = EditorSession::new();
        draw(&mut session, EditorMode::CreateRect, (0.0, 0.0), (50.0, 50.0));
        session.set_mode(EditorMode::Select);
        session.pointer_down(Point::new(100.0, 100.0));
        session.pointer_move(Point::new(-100.0, -100.0));
        session.cancel();
        assert!(session.gesture().is_idle());
        session.pointer_up();
        assert!(session.selection().is_empty());
    }
}
