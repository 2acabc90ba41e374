use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use contourkit::{convert, init_logging, Config, ConvertJob, LogFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

/// Project a flat ShopBot sketch onto a measured height profile.
#[derive(Debug, Parser)]
#[command(
    name = "contourkit",
    version,
    about,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")")
)]
struct Cli {
    /// Config file (.toml or .json); defaults to the user config if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Height profile (EPS path data in millimeters)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Flat sketch to project
    #[arg(short, long)]
    sketch: Option<PathBuf>,

    /// Where to write the projected sketch
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the converted profile table as CSV
    #[arg(long)]
    profile_csv: Option<PathBuf>,

    /// Clearance above the deepest cut for travel between passes (inches)
    #[arg(long)]
    fixture_safe_height: Option<f64>,

    /// Clearance above each cut's start depth for plunges (inches)
    #[arg(long)]
    material_safe_height: Option<f64>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatArg,
}

impl Cli {
    /// Config file values with command-line overrides applied
    fn resolve(&self) -> anyhow::Result<Config> {
        let mut config =
            Config::load_or_default(self.config.as_deref()).context("Failed to load config")?;

        if let Some(path) = &self.profile {
            config.files.profile = path.clone();
        }
        if let Some(path) = &self.sketch {
            config.files.sketch = path.clone();
        }
        if let Some(path) = &self.output {
            config.files.output = path.clone();
        }
        if let Some(path) = &self.profile_csv {
            config.files.profile_csv = Some(path.clone());
        }
        if let Some(height) = self.fixture_safe_height {
            config.heights.fixture_safe_height = height;
        }
        if let Some(height) = self.material_safe_height {
            config.heights.material_safe_height = height;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format.into())?;

    let config = cli.resolve()?;
    let report = convert(&ConvertJob::from(&config))?;

    println!(
        "{}: {} lines, Z max {:.6} in, travel height {:.6} in, {} cuts, {} inserted, {} removed",
        config.files.output.display(),
        report.lines_written,
        report.z_max,
        report.travel_height,
        report.stats.cuts,
        report.stats.inserted,
        report.stats.removed,
    );

    Ok(())
}
