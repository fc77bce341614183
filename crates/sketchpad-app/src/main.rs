//! Main application entry point.

use clap::Parser;
use sketchpad_app::{AppResult, Cli, Script, summary};
use sketchpad_core::{EditorConfig, EditorSession, ShortcutRegistry};
use std::process::ExitCode;

fn run(cli: Cli) -> AppResult<()> {
    if cli.shortcuts {
        ShortcutRegistry::print_all();
    }
    let Some(path) = cli.script else {
        return Ok(());
    };

    let config = match &cli.config {
        Some(config) => EditorConfig::load(config)?,
        None => EditorConfig::default(),
    };
    let script = Script::load(&path)?;
    let mut session = EditorSession::with_config(&config);
    let issued = script.replay(&mut session);
    log::info!("Replayed {} intents from {}", issued, path.display());

    for line in summary(&session) {
        println!("{line}");
    }
    let history = session.history();
    println!("history: {}/{} applied", history.cursor(), history.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting Sketchpad");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("sketchpad: {err}");
            ExitCode::FAILURE
        }
    }
}
