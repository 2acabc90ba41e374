//! # ContourKit Core
//!
//! Core types for ContourKit.
//! Provides the height profile lookup table, the sketch command model,
//! unit conversion, clearance heights and the error hierarchy shared by
//! every stage of the conversion.

pub mod command;
pub mod error;
pub mod profile;
pub mod safety;
pub mod units;

pub use command::{Command, Opcode, DELIMITER};
pub use error::{CommandError, Error, ProfileError, Result, SketchError};
pub use profile::{parse_profile_points, ProfilePoint, ProfileTable};
pub use safety::{SafetyHeights, DEFAULT_FIXTURE_SAFE_HEIGHT, DEFAULT_MATERIAL_SAFE_HEIGHT};
pub use units::{format_coordinate, mm_to_inches, MM_PER_INCH, UNIT_LABEL};
