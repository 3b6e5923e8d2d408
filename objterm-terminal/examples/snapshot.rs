/// Example: Render a single frame of an OBJ file to stdout
///
/// Usage: cargo run --example snapshot -- [path/to/model.obj] [yaw] [pitch]

use anyhow::{Context, Result};
use objterm_core::{load_obj, Mesh};
use objterm_terminal::{TerminalApp, ViewerConfig};
use std::env;
use std::io::{self, Write};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mesh = match args.first() {
        Some(path) => load_obj(path).with_context(|| format!("failed to load {}", path))?,
        None => Mesh::cube(2.0),
    };
    let angle = |i: usize| -> Result<f64> {
        args.get(i)
            .map(|s| s.parse::<f64>().with_context(|| format!("bad angle `{}`", s)))
            .transpose()
            .map(|a| a.unwrap_or(0.4))
    };

    let mut config = ViewerConfig::default();
    config.render.width = 120;
    config.render.height = 40;

    let mut app = TerminalApp::new(mesh, &config);
    app.set_orbit(angle(1)?, angle(2)?);
    app.render_frame();

    let mut stdout = io::stdout();
    app.draw(&mut stdout)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
