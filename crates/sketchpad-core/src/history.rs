//! Reversible commands and the linear undo/redo history.

use crate::collection::ShapeCollection;
use crate::shapes::{Anchors, ShapeColor, ShapeId, ShapeKind, TextStyle};
use kurbo::Point;
use std::collections::HashSet;

/// Which way a command is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Redo,
    Undo,
}

/// Creation parameters of an added shape and, once created, its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AddShape {
    pub kind: ShapeKind,
    pub position: Point,
    pub color: ShapeColor,
    pub font: TextStyle,
    /// Set on first redo; later redos reinsert this same shape.
    shape: Option<ShapeId>,
}

impl AddShape {
    pub fn new(kind: ShapeKind, position: Point, color: ShapeColor, font: TextStyle) -> Self {
        Self {
            kind,
            position,
            color,
            font,
            shape: None,
        }
    }

    /// The created shape, if the command has run.
    pub fn shape(&self) -> Option<ShapeId> {
        self.shape
    }
}

/// A reversible edit of the shape collection or of a single shape.
///
/// Every variant carries exactly what it needs to invert itself: either an
/// old/new value pair, or the identity of shapes whose ownership it holds
/// while they are detached.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddShape(AddShape),
    RemoveShape {
        shape: ShapeId,
        /// Paint-order slot the shape occupied when it was detached.
        index: Option<usize>,
    },
    MoveShape {
        shape: ShapeId,
        from: Point,
        to: Point,
    },
    RecolorShape {
        shape: ShapeId,
        from: ShapeColor,
        to: ShapeColor,
    },
    ClearAll {
        /// Members at the time of clearing, in paint order.
        shapes: Vec<ShapeId>,
    },
    ResizeShape {
        shape: ShapeId,
        from: Anchors,
        to: Anchors,
    },
    RestyleText {
        shape: ShapeId,
        from: TextStyle,
        to: TextStyle,
    },
}

impl Command {
    /// Command that creates a new shape when first applied.
    pub fn add_shape(kind: ShapeKind, position: Point, color: ShapeColor, font: TextStyle) -> Self {
        Command::AddShape(AddShape::new(kind, position, color, font))
    }

    /// Command that detaches a shape and restores it in place on undo.
    pub fn remove_shape(shape: ShapeId) -> Self {
        Command::RemoveShape { shape, index: None }
    }

    /// Name of the command for display.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddShape(_) => "Add Shape",
            Command::RemoveShape { .. } => "Delete Shape",
            Command::MoveShape { .. } => "Move Shape",
            Command::RecolorShape { .. } => "Change Color",
            Command::ClearAll { .. } => "Clear All",
            Command::ResizeShape { .. } => "Resize Shape",
            Command::RestyleText { .. } => "Change Font",
        }
    }

    /// The shape created by an `AddShape` command that has run.
    pub fn created_shape(&self) -> Option<ShapeId> {
        match self {
            Command::AddShape(add) => add.shape,
            _ => None,
        }
    }

    /// Every shape this command refers to.
    pub fn shapes(&self) -> Vec<ShapeId> {
        match self {
            Command::AddShape(add) => add.shape.into_iter().collect(),
            Command::ClearAll { shapes } => shapes.clone(),
            Command::RemoveShape { shape, .. }
            | Command::MoveShape { shape, .. }
            | Command::RecolorShape { shape, .. }
            | Command::ResizeShape { shape, .. }
            | Command::RestyleText { shape, .. } => vec![*shape],
        }
    }

    pub fn redo(&mut self, collection: &mut ShapeCollection) {
        self.apply(Direction::Redo, collection);
    }

    pub fn undo(&mut self, collection: &mut ShapeCollection) {
        self.apply(Direction::Undo, collection);
    }

    /// Apply the command forwards or backwards.
    pub fn apply(&mut self, direction: Direction, collection: &mut ShapeCollection) {
        let forward = direction == Direction::Redo;
        match self {
            Command::AddShape(add) => match (direction, add.shape) {
                (Direction::Redo, None) => {
                    let id = collection.create_and_insert(
                        add.kind,
                        add.position,
                        add.color,
                        add.font.clone(),
                    );
                    add.shape = Some(id);
                }
                (Direction::Redo, Some(id)) => {
                    collection.reinsert(id);
                }
                (Direction::Undo, Some(id)) => {
                    collection.detach(id);
                }
                (Direction::Undo, None) => {
                    log::warn!("Undo of an add that never ran");
                }
            },
            Command::RemoveShape { shape, index } => {
                if forward {
                    *index = collection.index_of(*shape);
                    collection.detach(*shape);
                } else {
                    match *index {
                        Some(slot) => collection.reinsert_at(*shape, slot),
                        None => collection.reinsert(*shape),
                    };
                }
            }
            Command::MoveShape { shape, from, to } => {
                let target = if forward { *to } else { *from };
                set_or_warn(collection, *shape, |s| s.set_position(target));
            }
            Command::RecolorShape { shape, from, to } => {
                let color = if forward { *to } else { *from };
                set_or_warn(collection, *shape, |s| s.set_color(color));
            }
            Command::ClearAll { shapes } => {
                if forward {
                    if collection.shapes() == shapes.as_slice() {
                        collection.clear_all();
                    } else {
                        for &id in shapes.iter() {
                            collection.detach(id);
                        }
                    }
                } else {
                    for &id in shapes.iter() {
                        collection.reinsert(id);
                    }
                }
            }
            Command::ResizeShape { shape, from, to } => {
                let anchors = if forward { *to } else { *from };
                set_or_warn(collection, *shape, |s| s.set_anchors(anchors));
            }
            Command::RestyleText { shape, from, to } => {
                let font = if forward { to.clone() } else { from.clone() };
                set_or_warn(collection, *shape, |s| s.set_font(font));
            }
        }
    }
}

fn set_or_warn(
    collection: &mut ShapeCollection,
    id: ShapeId,
    f: impl FnOnce(&mut crate::shapes::Shape),
) {
    if collection.update(id, f).is_none() {
        log::warn!("Command refers to freed shape {}", id);
    }
}

/// Linear undo/redo history.
///
/// Commands before the cursor are applied; commands after it were undone and
/// can be redone until a new command is pushed.
#[derive(Debug, Clone, Default)]
pub struct CommandStack {
    commands: Vec<Command>,
    cursor: usize,
    /// Maximum number of commands kept (None = unbounded).
    limit: Option<usize>,
}

impl CommandStack {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that forgets its oldest commands beyond `limit`.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Execute a command and record it, discarding anything that was undone.
    pub fn push(&mut self, mut command: Command, collection: &mut ShapeCollection) -> &Command {
        command.redo(collection);
        log::debug!("Applied {}", command.name());

        let mut dropped: Vec<Command> = self.commands.drain(self.cursor..).collect();
        self.commands.push(command);
        if let Some(limit) = self.limit {
            let excess = self.commands.len().saturating_sub(limit.max(1));
            dropped.extend(self.commands.drain(..excess));
        }
        self.cursor = self.commands.len();
        self.release(dropped, collection);

        &self.commands[self.cursor - 1]
    }

    /// Revert the most recently applied command.
    /// Returns false if there is nothing to undo.
    pub fn undo(&mut self, collection: &mut ShapeCollection) -> bool {
        if self.cursor == 0 {
            log::debug!("Nothing to undo");
            return false;
        }
        self.cursor -= 1;
        let command = &mut self.commands[self.cursor];
        command.undo(collection);
        log::debug!("Undid {}", command.name());
        true
    }

    /// Re-apply the most recently undone command.
    /// Returns false if there is nothing to redo.
    pub fn redo(&mut self, collection: &mut ShapeCollection) -> bool {
        if self.cursor == self.commands.len() {
            log::debug!("Nothing to redo");
            return false;
        }
        let command = &mut self.commands[self.cursor];
        command.redo(collection);
        log::debug!("Redid {}", command.name());
        self.cursor += 1;
        true
    }

    /// Undo the latest command and forget it entirely.
    /// Only valid while nothing is waiting to be redone.
    pub fn rollback(&mut self, collection: &mut ShapeCollection) -> Option<Command> {
        if self.cursor == 0 || self.cursor != self.commands.len() {
            log::warn!("Rollback requested with no command on top of the history");
            return None;
        }
        self.undo(collection);
        let command = self.commands.pop()?;
        log::debug!("Rolled back {}", command.name());
        self.release(vec![command.clone()], collection);
        Some(command)
    }

    /// Forget every command.
    pub fn clear(&mut self, collection: &mut ShapeCollection) {
        let dropped = std::mem::take(&mut self.commands);
        self.cursor = 0;
        self.release(dropped, collection);
    }

    /// Free detached shapes that no remaining command can bring back.
    fn release(&self, dropped: Vec<Command>, collection: &mut ShapeCollection) {
        if dropped.is_empty() {
            return;
        }
        let candidates: HashSet<ShapeId> = dropped.iter().flat_map(Command::shapes).collect();
        let still_referenced: HashSet<ShapeId> =
            self.commands.iter().flat_map(Command::shapes).collect();
        for id in candidates {
            if !collection.contains(id) && !still_referenced.contains(&id) {
                collection.discard(id);
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    /// Number of recorded commands, applied or not.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of applied commands.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Applied commands, oldest first.
    pub fn applied(&self) -> &[Command] {
        &self.commands[..self.cursor]
    }
}
