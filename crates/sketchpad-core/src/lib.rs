//! Sketchpad Core Library
//!
//! Shapes, the identity-preserving shape collection, the undo/redo history
//! and the editor session that turns pointer gestures into commands.

pub mod collection;
pub mod config;
pub mod history;
pub mod input;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod tools;

pub use collection::{CollectionChange, ShapeCollection};
pub use config::{ConfigError, ConfigResult, EditorConfig};
pub use history::{Command, CommandStack, Direction};
pub use input::{Intent, KeyTrigger, Shortcut, ShortcutRegistry};
pub use selection::{Handle, ResizeHandle};
pub use session::EditorSession;
pub use shapes::{Shape, ShapeColor, ShapeId, ShapeKind, ShapeTrait, TextStyle};
pub use tools::{EditorMode, Gesture, ToolManager};
