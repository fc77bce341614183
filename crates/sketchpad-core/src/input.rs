//! High-level intents issued by UI adapters, and the keyboard shortcuts that
//! produce them.

use crate::shapes::{ShapeColor, TextStyle};
use crate::tools::EditorMode;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A request from the outside world to the editor session.
///
/// Positions are in scene coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    SetMode { mode: EditorMode },
    SetColor { color: ShapeColor },
    SetFont { font: TextStyle },
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp,
    Cancel,
    DeleteSelection,
    ClearAll,
    Undo,
    Redo,
    RecolorSelection { color: ShapeColor },
    RestyleSelectedText { font: TextStyle },
    EditText { text: String },
    FinishTextEdit,
    SelectAll,
    ClearSelection,
}

/// Action bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelection,
    Undo,
    Redo,
    SelectAll,
    Cancel,
}

impl ShortcutAction {
    /// The intent this action issues.
    pub fn intent(self) -> Intent {
        match self {
            ShortcutAction::DeleteSelection => Intent::DeleteSelection,
            ShortcutAction::Undo => Intent::Undo,
            ShortcutAction::Redo => Intent::Redo,
            ShortcutAction::SelectAll => Intent::SelectAll,
            ShortcutAction::Cancel => Intent::Cancel,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub action: ShortcutAction,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        action: ShortcutAction,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Check whether a key press triggers this shortcut.
    pub fn matches(&self, trigger: &KeyTrigger) -> bool {
        self.ctrl == trigger.ctrl
            && self.shift == trigger.shift
            && self.key.eq_ignore_ascii_case(&trigger.key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("A", true, false, "Select all shapes", SelectAll),
            Shortcut::new("Z", true, false, "Undo", Undo),
            Shortcut::new("Z", true, true, "Redo", Redo),
            Shortcut::new("Y", true, false, "Redo", Redo),
            Shortcut::new("Delete", false, false, "Delete selected shapes", DeleteSelection),
            Shortcut::new("Backspace", false, false, "Delete selected shapes", DeleteSelection),
            Shortcut::new("Escape", false, false, "Cancel current action", Cancel),
        ]
    }

    /// Find the shortcut a key press triggers.
    pub fn lookup(trigger: &KeyTrigger) -> Option<Shortcut> {
        Self::all().into_iter().find(|shortcut| shortcut.matches(trigger))
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTrigger {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyTrigger {
    pub fn new(key: impl Into<String>, ctrl: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift,
        }
    }

    /// A key pressed without modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, false, false)
    }

    /// A key pressed with Ctrl held.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self::new(key, true, false)
    }

    /// Resolve the key press into an intent, if it is bound.
    pub fn resolve(&self) -> Option<Intent> {
        ShortcutRegistry::lookup(self).map(|shortcut| shortcut.action.intent())
    }
}
