/// flatshade - flat-shaded Phong renderer in the terminal
///
/// Controls:
///   - R: Reload camera and light sources
///   - C / L: Reload only the camera / only the light
///   - W: Toggle wireframe
///   - Q/ESC: Quit
use std::io::stdout;

use anyhow::{Context, Result};
use clap::Parser;
use flatshade_core::{FrameDriver, RenderSettings, Viewport};
use flatshade_terminal::cli::Cli;
use flatshade_terminal::{render_once, surface_size, TerminalApp};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;

    let (width, height) = surface_size();
    let settings = RenderSettings {
        mode: cli.mode.into(),
        viewport: Viewport::new(width as u32, height as u32),
    };

    let mut driver = FrameDriver::new(cli.sources(), settings);
    driver.load().context("failed to load scene")?;

    if cli.once {
        let stats = render_once(&mut driver, cli.draw_mode(), &mut stdout())?;
        log::info!("{} triangles drawn, {} skipped", stats.drawn, stats.skipped);
        return Ok(());
    }

    let mut app = TerminalApp::new(driver, cli.draw_mode());
    app.run()?;

    Ok(())
}
