//! Command-line interface for generating maps from the built-in tile sets

use crate::algorithm::executor::{Completion, FailureMode, GenerationOptions, generate};
use crate::io::configuration::{
    CELL_PIXELS, DEFAULT_DEPTH, DEFAULT_HEIGHT, DEFAULT_RETRIES, DEFAULT_SEED, DEFAULT_STEP_LIMIT,
    DEFAULT_WIDTH, MAX_GRID_DIMENSION, OUTPUT_SUFFIX,
};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::io::image::{completion_layer, export_layer_as_png, render_ascii};
use crate::io::progress::ProgressReporter;
use crate::io::tilesets::{Tileset, bridges, roads, stripes};
use crate::model::synthesize;
use crate::spatial::grid::{CubeGrid, Grid, SquareGrid};
use crate::spatial::tiles::{FaceLayout, FacePattern, Paint};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Built-in tile set selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TilesetKind {
    /// Ground, water and shore
    Stripes,
    /// Road network
    Roads,
    /// Roads, water and two-cell bridges
    Bridges,
}

impl TilesetKind {
    /// Build the tile set
    pub fn build(self) -> Tileset {
        match self {
            Self::Stripes => stripes(),
            Self::Roads => roads(),
            Self::Bridges => bridges(),
        }
    }
}

/// Failure mode selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailureModeArg {
    /// Report only where the contradiction happened
    Cancel,
    /// Keep the failing state
    Last,
    /// Replay the state before the failing step
    LastGood,
    /// Shrink to a minimal reproducing set of decisions
    Minimal,
}

impl From<FailureModeArg> for FailureMode {
    fn from(arg: FailureModeArg) -> Self {
        match arg {
            FailureModeArg::Cancel => Self::Cancel,
            FailureModeArg::Last => Self::Last,
            FailureModeArg::LastGood => Self::LastGood,
            FailureModeArg::Minimal => Self::Minimal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tilecore")]
#[command(
    author,
    version,
    about = "Generate tile maps with wave function collapse"
)]
/// Command-line arguments for the generation tool
pub struct Cli {
    /// Built-in tile set to generate with
    #[arg(short, long, value_enum, default_value_t = TilesetKind::Roads)]
    pub tileset: TilesetKind,

    /// Grid width in cells
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Grid height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Grid depth in cells; more than one layer switches to a cubic grid
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Steps before giving up on an attempt (0 = unbounded)
    #[arg(short = 'l', long, default_value_t = DEFAULT_STEP_LIMIT)]
    pub step_limit: usize,

    /// Extra attempts after a contradiction
    #[arg(short, long, default_value_t = DEFAULT_RETRIES)]
    pub retries: usize,

    /// Undo failing choices instead of failing the attempt
    #[arg(short, long)]
    pub backtrack: bool,

    /// What to report when generation fails
    #[arg(short, long, value_enum, default_value_t = FailureModeArg::Cancel)]
    pub failure_mode: FailureModeArg,

    /// Paint every face on the grid edge must match
    #[arg(long)]
    pub skybox: Option<Paint>,

    /// Write a PNG of the bottom layer; a directory gets a generated file name
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Validate the grid dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero or above the safety limit
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        Ok(())
    }

    /// Generation options derived from the arguments
    pub fn options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::default()
            .with_seed(self.seed)
            .with_step_limit(self.step_limit)
            .with_retries(self.retries)
            .with_backtrack(self.backtrack)
            .with_failure_mode(self.failure_mode.into());
        if let Some(paint) = self.skybox {
            options = options.with_skybox(FacePattern::uniform(FaceLayout::Square, paint));
        }
        options
    }

    /// Output path, resolving directories to a generated file name
    pub fn output_path(&self) -> Option<PathBuf> {
        let output = self.output.as_ref()?;
        if output.is_dir() {
            let name = format!("{}_{}{}.png", self.tileset.build().name, self.seed, OUTPUT_SUFFIX);
            Some(output.join(name))
        } else {
            Some(output.clone())
        }
    }
}

/// Runs one generation request described by the command line
pub struct Generator {
    cli: Cli,
    progress: Option<ProgressReporter>,
}

impl Generator {
    /// Create a generator for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli.should_show_progress().then(ProgressReporter::new);
        Self { cli, progress }
    }

    /// Synthesize, generate and write the result
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The arguments are invalid
    /// - Synthesis or setup fails
    /// - Every attempt ends in a contradiction
    /// - The output cannot be written
    pub fn process(&self) -> Result<Completion> {
        self.cli.validate()?;
        if self.cli.depth > 1 {
            let grid = CubeGrid::new(self.cli.width, self.cli.height, self.cli.depth);
            self.process_grid(&grid)
        } else {
            let grid = SquareGrid::new(self.cli.width, self.cli.height);
            self.process_grid(&grid)
        }
    }

    fn process_grid<G: Grid>(&self, grid: &G) -> Result<Completion> {
        let tileset = self.cli.tileset.build();
        let model = synthesize(&tileset.definitions, grid)?;
        info!(
            tileset = tileset.name,
            instances = model.tile_count(),
            cells = grid.cell_count(),
            "synthesized model"
        );

        let mut options = self.cli.options();
        if let Some(progress) = &self.progress {
            options = options.with_progress(progress.callback());
        }

        let result = generate(&model, grid, &[], &options);
        if let Some(progress) = &self.progress {
            progress.finish();
        }
        let completion = result?;
        info!(
            success = completion.success,
            retries = completion.retries,
            steps = completion.steps,
            "generation finished"
        );

        let layer = completion_layer(&completion, self.cli.width, self.cli.height, 0);
        match self.cli.output_path() {
            Some(path) => {
                export_layer_as_png(&layer, &tileset.colors, CELL_PIXELS, &path)?;
                info!(path = %path.display(), "wrote image");
            }
            None => write_text(&render_ascii(&layer, &tileset.glyphs))?,
        }

        completion.into_result()
    }
}

fn write_text(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .map_err(|e| GenerationError::FileSystem {
            path: Path::new("<stdout>").to_path_buf(),
            operation: "write",
            source: e,
        })
}
