//! # ContourKit Toolpath
//!
//! Turns a flat ShopBot sketch into a profile-following 3D toolpath.
//! Includes the sketch segmenter, the curve transformer and the
//! line-oriented file collaborators used around them.

pub mod file_io;
pub mod segmenter;
pub mod sketch;
pub mod transformer;

pub use file_io::{read_lines, write_lines, FileReadStats, LineFileReader};
pub use segmenter::{SketchSegmenter, SketchSegments};
pub use sketch::{transform_segments, transform_sketch, SketchTransform};
pub use transformer::{CurveTransformer, TransformStats, TransformedCurve};
