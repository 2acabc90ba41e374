//! # ContourKit
//!
//! Projects a flat ShopBot cutting sketch onto a measured height profile:
//! - cut depths follow the profile by linear interpolation
//! - travel between cut passes happens at a fixture-safe height above the
//!   deepest cut
//! - plunges stop at a material-safe height just above each new cut
//!
//! ## Architecture
//!
//! ContourKit is organized as a workspace with multiple crates:
//!
//! 1. **contourkit-core** - Profile table, sketch commands, units, errors
//! 2. **contourkit-toolpath** - Sketch segmentation, curve transformation, file I/O
//! 3. **contourkit-settings** - Configuration files and validation
//! 4. **contourkit** - The conversion job and the command-line binary

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

pub use contourkit_core::{
    Command, CommandError, Error, Opcode, ProfileError, ProfileTable, Result, SafetyHeights,
    SketchError,
};
pub use contourkit_settings::{Config, FileSettings, SettingsError};
pub use contourkit_toolpath::{
    transform_sketch, CurveTransformer, SketchSegmenter, SketchTransform, TransformStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Sets up structured logging on stderr with:
/// - RUST_LOG environment variable support (defaults to info)
/// - Pretty or JSON formatting
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .compact();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// A fully resolved conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertJob {
    /// Height profile source
    pub profile: PathBuf,
    /// Flat sketch source
    pub sketch: PathBuf,
    /// Projected sketch destination
    pub output: PathBuf,
    /// Optional destination for the converted profile table
    pub profile_csv: Option<PathBuf>,
    /// Clearance heights
    pub heights: SafetyHeights,
}

impl From<&Config> for ConvertJob {
    fn from(config: &Config) -> Self {
        Self {
            profile: config.files.profile.clone(),
            sketch: config.files.sketch.clone(),
            output: config.files.output.clone(),
            profile_csv: config.files.profile_csv.clone(),
            heights: config.heights,
        }
    }
}

/// Summary of a completed conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertReport {
    /// Points in the profile table
    pub profile_points: usize,
    /// Lines written to the output sketch
    pub lines_written: usize,
    /// Deepest interpolated cut depth
    pub z_max: f64,
    /// Fixture travel height
    pub travel_height: f64,
    /// What the curve transform changed
    pub stats: TransformStats,
}

/// Run a conversion
///
/// Nothing is written unless the whole transform succeeds.
pub fn convert(job: &ConvertJob) -> anyhow::Result<ConvertReport> {
    job.heights
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid safety heights")?;

    info!("Processing profile data from {}", job.profile.display());
    let profile_lines = contourkit_toolpath::read_lines(&job.profile)?;
    let profile = ProfileTable::from_lines(&profile_lines)
        .with_context(|| format!("Invalid profile {}", job.profile.display()))?;
    let (min, max) = profile.position_range();
    info!(
        points = profile.len(),
        min_position = min,
        max_position = max,
        "Profile table built"
    );

    info!("Transforming sketch {}", job.sketch.display());
    let sketch_lines = contourkit_toolpath::read_lines(&job.sketch)?;
    let result = transform_sketch(&sketch_lines, &profile, job.heights)
        .with_context(|| format!("Invalid sketch {}", job.sketch.display()))?;

    let output_lines = result.to_lines();
    contourkit_toolpath::write_lines(&job.output, &output_lines)?;
    info!(
        lines = output_lines.len(),
        "Wrote projected sketch to {}",
        job.output.display()
    );

    if let Some(csv) = &job.profile_csv {
        contourkit_toolpath::write_lines(csv, profile.to_csv_lines())?;
        info!("Wrote profile table to {}", csv.display());
    }

    Ok(ConvertReport {
        profile_points: profile.len(),
        lines_written: output_lines.len(),
        z_max: result.z_max,
        travel_height: result.travel_height,
        stats: result.stats,
    })
}
