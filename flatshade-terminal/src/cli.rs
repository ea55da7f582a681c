// cli.rs - Command-line interface configuration
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flatshade_core::{ProjectionMode, SceneSources};

use crate::renderer::DrawMode;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Offset from the eye point, y flipped so world +y is up
    Direct,
    /// Full view matrix with perspective divide by z + d
    ViewMatrix,
}

impl From<Mode> for ProjectionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Direct => ProjectionMode::Direct,
            Mode::ViewMatrix => ProjectionMode::ViewMatrix,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "flatshade")]
#[command(
    author,
    version,
    about = "Flat-shaded Phong mesh renderer for the terminal",
    long_about = None
)]
pub struct Cli {
    /// Mesh source in BYU layout; a cube is used when omitted
    #[arg(short, long)]
    pub mesh: Option<PathBuf>,

    /// Camera source (N, V, d, hx, hy, C)
    #[arg(short, long, default_value = "camera.txt")]
    pub camera: PathBuf,

    /// Light source (Iamb, Ka, Il, Pl, Kd, Od, Ks, eta)
    #[arg(short, long, default_value = "light.txt")]
    pub light: PathBuf,

    /// Projection convention, fixed for the session
    #[arg(long, value_enum, default_value_t = Mode::Direct)]
    pub mode: Mode,

    /// Draw triangle edges instead of filled faces
    #[arg(short, long)]
    pub wireframe: bool,

    /// Render a single frame to stdout and exit
    #[arg(long)]
    pub once: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file; interactive sessions log nothing otherwise
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn sources(&self) -> SceneSources {
        SceneSources {
            mesh: self.mesh.clone(),
            camera: self.camera.clone(),
            light: self.light.clone(),
        }
    }

    pub fn draw_mode(&self) -> DrawMode {
        if self.wireframe {
            DrawMode::Wireframe
        } else {
            DrawMode::Filled
        }
    }

    fn default_filter(&self) -> &'static str {
        match (self.verbose, self.once || self.log_file.is_some()) {
            // stderr would scribble over the alternate screen
            (_, false) => "off",
            (true, true) => "debug",
            (false, true) => "info",
        }
    }

    pub fn init_logging(&self) -> Result<()> {
        let env = env_logger::Env::default().default_filter_or(self.default_filter());
        let mut builder = env_logger::Builder::from_env(env);

        if let Some(path) = &self.log_file {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        builder.try_init().context("failed to initialize logger")
    }
}
