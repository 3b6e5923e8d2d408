/// Terminal viewer for the objterm rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, trace};
use objterm_core::{Camera, Mat4, Mesh, Orbit, Renderer};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod renderer;

pub use config::{CliArgs, ViewerConfig};
pub use renderer::AsciiRenderer;

const HINT: &str = "[AD] Rotate, [Up/Down] Tilt, [WS] Zoom, [ESC] Exit";

/// Interactive viewer state: one mesh, an orbiting model and a fixed camera
pub struct TerminalApp {
    mesh: Mesh,
    base_model: Mat4,
    orbit: Orbit,
    camera: Camera,
    renderer: Renderer,
    ascii: AsciiRenderer,
    rotate_step: f64,
    zoom_factor: f64,
    running: bool,
    dirty: bool,
    frame_time: Duration,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &ViewerConfig) -> Self {
        let renderer = Renderer::with_light(
            config.render.width,
            config.render.height,
            config.render.light_direction(),
        );

        Self {
            base_model: mesh.fit_transform(),
            mesh,
            orbit: Orbit::default(),
            camera: config.camera.camera(),
            renderer,
            ascii: AsciiRenderer::new(&config.display),
            rotate_step: config.camera.rotate_step,
            zoom_factor: config.camera.zoom_factor,
            running: true,
            dirty: true,
            frame_time: Duration::ZERO,
        }
    }

    pub fn orbit(&self) -> Orbit {
        self.orbit
    }

    pub fn set_orbit(&mut self, yaw: f64, pitch: f64) {
        self.orbit = Orbit::new(yaw, pitch);
        self.dirty = true;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let result = execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .and_then(|_| self.main_loop());

        // Restore the terminal even when the loop failed
        let restored = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        terminal::disable_raw_mode()?;

        result.and(restored)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut stdout = stdout();

        while self.running {
            if self.dirty {
                self.render_frame();
                self.draw(&mut stdout)?;
                stdout.flush()?;
            }

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => {
                        self.handle_key(key);
                    }
                    Event::Resize(cols, rows) => {
                        debug!("terminal resized to {}x{}", cols, rows);
                        queue!(stdout, terminal::Clear(ClearType::All))?;
                        self.dirty = true;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Apply one key event; returns whether the view changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let step = self.rotate_step;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.running = false;
                return false;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.orbit.rotate(step, 0.0),
            KeyCode::Char('d') | KeyCode::Char('D') => self.orbit.rotate(-step, 0.0),
            KeyCode::Up => self.orbit.rotate(0.0, -step),
            KeyCode::Down => self.orbit.rotate(0.0, step),
            KeyCode::Char('w') | KeyCode::Char('W') => self.camera.zoom_in(self.zoom_factor),
            KeyCode::Char('s') | KeyCode::Char('S') => self.camera.zoom_out(self.zoom_factor),
            _ => return false,
        }

        self.dirty = true;
        true
    }

    /// Model matrix for the current orbit
    pub fn model_matrix(&self) -> Mat4 {
        self.orbit.matrix() * self.base_model
    }

    /// Rasterize the mesh with the current camera and orbit
    pub fn render_frame(&mut self) {
        let start = Instant::now();
        self.renderer.view_proj = self.camera.view_proj(&self.model_matrix());
        self.renderer.render(&self.mesh);
        self.frame_time = start.elapsed();
        self.dirty = false;

        let stats = self.renderer.stats();
        trace!(
            "frame: {} triangles, {} culled, {} pixels in {:?}",
            stats.triangles,
            stats.culled,
            stats.drawn_pixels,
            self.frame_time
        );
    }

    /// Write the last rendered frame and the key hint line
    pub fn draw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        queue!(writer, cursor::MoveTo(0, 0))?;
        self.ascii.draw(&self.renderer, writer)?;
        queue!(
            writer,
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | {:.1} ms",
                HINT,
                self.frame_time.as_secs_f64() * 1000.0
            )),
            ResetColor
        )?;
        Ok(())
    }
}
