/// objterm - view an OBJ model in the terminal
///
/// Controls:
///   - A/D: Rotate around the vertical axis
///   - Up/Down: Tilt
///   - W/S: Zoom in/out
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use objterm_core::{load_obj, Mesh};
use objterm_terminal::{CliArgs, TerminalApp, ViewerConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let mesh = match &args.model {
        Some(path) => load_obj(path)
            .with_context(|| format!("failed to load model {}", path.display()))?,
        None => {
            info!("no model given, showing the built-in cube");
            Mesh::cube(2.0)
        }
    };

    let mut app = TerminalApp::new(mesh, &config);
    app.run().context("terminal session failed")?;
    Ok(())
}
