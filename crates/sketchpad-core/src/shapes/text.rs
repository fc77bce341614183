//! Text styling.

use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    /// Light weight.
    Light,
    /// Regular weight (default).
    #[default]
    Regular,
    /// Heavy/Bold weight.
    Heavy,
}

/// Font description carried by every shape and applied to text content.
///
/// Only the family name is stored; resolving it to an actual face is left to
/// whatever renders the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family name.
    pub family: String,
    /// Font size in points.
    pub size: f64,
    pub weight: FontWeight,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    /// Default family used when nothing else is configured.
    pub const DEFAULT_FAMILY: &'static str = "Sans Serif";
    /// Default font size (points).
    pub const DEFAULT_SIZE: f64 = 12.0;

    /// Create a regular-weight style for a family and size.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Check if the weight renders as bold.
    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Heavy
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: Self::DEFAULT_FAMILY.to_string(),
            size: Self::DEFAULT_SIZE,
            weight: FontWeight::default(),
            italic: false,
            underline: false,
        }
    }
}
