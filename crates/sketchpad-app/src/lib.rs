mod cli;
mod script;

pub use cli::Cli;
pub use script::{AppError, AppResult, Script, Step, summary};
