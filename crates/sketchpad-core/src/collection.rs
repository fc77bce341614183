//! Shape ownership and paint order.

use crate::shapes::{Shape, ShapeColor, ShapeId, ShapeKind, ShapeTrait, TextStyle};
use kurbo::{Point, Rect};
use std::collections::HashMap;
use std::fmt;

/// Change notification emitted by [`ShapeCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    /// A shape became a member (freshly created or reinserted).
    Inserted(ShapeId),
    /// A shape left the membership but is still allocated.
    Detached(ShapeId),
    /// A shape's state changed in place.
    Updated(ShapeId),
    /// Every member was detached at once.
    Cleared,
    /// A detached shape was freed for good.
    Discarded(ShapeId),
}

type Listener = Box<dyn FnMut(&CollectionChange)>;

/// Ordered, identity-preserving set of shapes.
///
/// Every shape ever created lives in the arena until it is discarded.
/// Membership (and therefore paint order, back to front) is tracked
/// separately, so detaching and reinserting never reallocates a shape.
pub struct ShapeCollection {
    /// All allocated shapes, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Members in z-order (back to front).
    z_order: Vec<ShapeId>,
    listeners: Vec<Listener>,
}

impl Default for ShapeCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShapeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeCollection")
            .field("z_order", &self.z_order)
            .field("allocated", &self.shapes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ShapeCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a callback invoked after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&CollectionChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, change: CollectionChange) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    /// Allocate a zero-size shape at `position` and put it on top.
    pub fn create_and_insert(
        &mut self,
        kind: ShapeKind,
        position: Point,
        color: ShapeColor,
        font: TextStyle,
    ) -> ShapeId {
        let shape = Shape::new(kind, position, color, font);
        let id = shape.id();
        self.shapes.insert(id, shape);
        self.z_order.push(id);
        log::debug!("Created {} {}", kind.name(), id);
        self.notify(CollectionChange::Inserted(id));
        id
    }

    /// Put a previously detached shape back on top.
    /// Returns false if the shape is already a member or was never allocated.
    pub fn reinsert(&mut self, id: ShapeId) -> bool {
        self.reinsert_at(id, self.z_order.len())
    }

    /// Put a previously detached shape back at a paint-order slot
    /// (clamped to the top).
    pub fn reinsert_at(&mut self, id: ShapeId, index: usize) -> bool {
        if self.contains(id) {
            log::warn!("Ignoring reinsert of shape {} that is already present", id);
            return false;
        }
        if !self.shapes.contains_key(&id) {
            log::warn!("Ignoring reinsert of unknown shape {}", id);
            return false;
        }
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        self.notify(CollectionChange::Inserted(id));
        true
    }

    /// Remove a shape from the membership without freeing it.
    /// Returns false if the shape was not a member.
    pub fn detach(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.z_order.remove(index);
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.set_selected(false);
            shape.set_editing(false);
        }
        self.notify(CollectionChange::Detached(id));
        true
    }

    /// Detach every member, returning them in their former paint order.
    pub fn clear_all(&mut self) -> Vec<ShapeId> {
        let detached = std::mem::take(&mut self.z_order);
        if detached.is_empty() {
            return detached;
        }
        for id in &detached {
            if let Some(shape) = self.shapes.get_mut(id) {
                shape.set_selected(false);
                shape.set_editing(false);
            }
        }
        self.notify(CollectionChange::Cleared);
        detached
    }

    /// Free a detached shape. Members are never discarded.
    pub fn discard(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            log::warn!("Refusing to discard shape {} while it is present", id);
            return false;
        }
        if self.shapes.remove(&id).is_none() {
            return false;
        }
        log::debug!("Discarded shape {}", id);
        self.notify(CollectionChange::Discarded(id));
        true
    }

    /// Mutate an allocated shape in place and notify listeners.
    pub fn update<R>(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape) -> R) -> Option<R> {
        let result = f(self.shapes.get_mut(&id)?);
        self.notify(CollectionChange::Updated(id));
        Some(result)
    }

    /// Get an allocated shape (member or detached).
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Check if a shape is currently a member.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.z_order.contains(&id)
    }

    /// Check if a shape is still allocated (member or detached).
    pub fn is_allocated(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Paint-order position of a member.
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&shape_id| shape_id == id)
    }

    /// Member IDs in z-order (back to front).
    pub fn shapes(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Members in z-order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Number of allocated shapes, detached ones included.
    pub fn allocated(&self) -> usize {
        self.shapes.len()
    }

    /// Find members at a point (in scene coordinates), front to back.
    pub fn shapes_at_point(&self, point: Point) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter(|&&id| self.shapes.get(&id).is_some_and(|s| s.hit_test(point)))
            .copied()
            .collect()
    }

    /// Topmost member under a point.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .find(|&&id| self.shapes.get(&id).is_some_and(|s| s.hit_test(point)))
            .copied()
    }

    /// Members whose scene bounds overlap a rectangle, in z-order.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        self.iter()
            .filter(|s| rect.intersect(s.scene_bounds()).area() > 0.0)
            .map(|s| s.id())
            .collect()
    }

    /// Selected members in z-order.
    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.iter().filter(|s| s.is_selected()).map(|s| s.id()).collect()
    }
}
