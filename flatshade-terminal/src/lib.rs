/// Terminal front end for the flatshade pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use flatshade_core::{Command, FrameDriver, FrameStats, ReloadTarget, Viewport};
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod cli;
pub mod renderer;

pub use renderer::{CellRenderer, DrawMode};

/// Pause between frames (~60 FPS)
const FRAME_DELAY: Duration = Duration::from_millis(16);

/// Surface size when stdout is not a terminal
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Current terminal size in cells, or a fixed fallback
pub fn surface_size() -> (u16, u16) {
    terminal::size().unwrap_or(FALLBACK_SIZE)
}

/// Map a key press to a driver command or a local drawing toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Driver(Command),
    ToggleWireframe,
}

fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Driver(Command::Quit));
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Driver(Command::Quit)),
        KeyCode::Char('r') => Some(Action::Driver(Command::Reload(ReloadTarget::All))),
        KeyCode::Char('c') => Some(Action::Driver(Command::Reload(ReloadTarget::Camera))),
        KeyCode::Char('l') => Some(Action::Driver(Command::Reload(ReloadTarget::Light))),
        KeyCode::Char('w') => Some(Action::ToggleWireframe),
        _ => None,
    }
}

fn describe(command: Command) -> &'static str {
    match command {
        Command::Reload(ReloadTarget::All) => "camera and light reloaded",
        Command::Reload(ReloadTarget::Camera) => "camera reloaded",
        Command::Reload(ReloadTarget::Light) => "light reloaded",
        Command::Quit => "quitting",
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    driver: FrameDriver,
    renderer: CellRenderer,
    stats: FrameStats,
    status: String,
}

impl TerminalApp {
    /// Wrap a driver that has already been loaded
    pub fn new(mut driver: FrameDriver, mode: DrawMode) -> Self {
        let (width, height) = surface_size();
        driver.set_viewport(Viewport::new(width as u32, height as u32));

        Self {
            driver,
            renderer: CellRenderer::new(width as usize, height as usize, mode),
            stats: FrameStats::default(),
            status: String::from("ready"),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.driver.is_running() {
            // Handle input
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.driver.is_running() {
                break;
            }

            // Render
            if let Some(stats) = self.driver.step_frame(&mut self.renderer) {
                self.stats = stats;
            }
            self.present()?;

            std::thread::sleep(FRAME_DELAY);
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match action_for(&key) {
                Some(Action::Driver(command)) => match self.driver.handle(command) {
                    Ok(()) => self.status = describe(command).to_string(),
                    Err(err) => self.status = format!("reload failed: {}", err),
                },
                Some(Action::ToggleWireframe) => {
                    let mode = self.renderer.mode().toggled();
                    self.renderer.set_mode(mode);
                    self.status = format!("{:?}", mode).to_lowercase();
                }
                None => {}
            },
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.driver
                    .set_viewport(Viewport::new(width as u32, height as u32));
            }
            _ => {}
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let mut overlay = format!(
            "flatshade | {:?} | {} drawn, {} skipped | R=reload C=camera L=light W=wireframe Q=quit | {}",
            self.driver.settings().mode,
            self.stats.drawn,
            self.stats.skipped,
            self.status
        );
        if let Some((cut, _)) = overlay.char_indices().nth(self.renderer.width()) {
            overlay.truncate(cut);
        }
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(overlay),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Render one frame of a loaded driver to `writer` without touching terminal modes
pub fn render_once<W: Write>(
    driver: &mut FrameDriver,
    mode: DrawMode,
    writer: &mut W,
) -> io::Result<FrameStats> {
    let (width, height) = surface_size();
    driver.set_viewport(Viewport::new(width as u32, height as u32));

    let mut renderer = CellRenderer::new(width as usize, height as usize, mode);
    let stats = driver.step_frame(&mut renderer).unwrap_or_default();

    renderer.draw(writer)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(stats)
}
