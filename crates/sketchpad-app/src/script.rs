//! Intent scripts: a JSON list of steps replayed through an editor session.

use serde::{Deserialize, Serialize};
use sketchpad_core::{ConfigError, EditorSession, Intent, KeyTrigger, ShapeTrait};
use std::path::Path;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script error: {0}")]
    Script(#[from] serde_json::Error),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// One scripted step: either a key press or a direct intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Key { key: KeyTrigger },
    Intent(Intent),
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Feed every step into the session. Returns the number of intents issued.
    pub fn replay(&self, session: &mut EditorSession) -> usize {
        let mut issued = 0;
        for step in &self.steps {
            let intent = match step {
                Step::Intent(intent) => intent.clone(),
                Step::Key { key } => match key.resolve() {
                    Some(intent) => intent,
                    None => {
                        log::warn!("No shortcut bound to {:?}", key);
                        continue;
                    }
                },
            };
            session.dispatch(intent);
            issued += 1;
        }
        issued
    }
}

/// One line per present shape, back to front.
pub fn summary(session: &EditorSession) -> Vec<String> {
    session
        .shapes()
        .map(|shape| {
            let bounds = shape.scene_bounds();
            let mut line = format!(
                "{} {} ({:.1}, {:.1}) - ({:.1}, {:.1}) {}",
                shape.kind().name(),
                shape.id(),
                bounds.x0,
                bounds.y0,
                bounds.x1,
                bounds.y1,
                shape.color().to_hex(),
            );
            if !shape.text().is_empty() {
                line.push_str(&format!(" {:?}", shape.text()));
            }
            line
        })
        .collect()
}
