//! Whole-sketch transform
//!
//! Ties segmentation and curve transformation together and owns the final
//! header, rewritten curve and footer.

use contourkit_core::{Command, ProfileTable, Result, SafetyHeights};
use serde::{Deserialize, Serialize};

use crate::segmenter::{SketchSegmenter, SketchSegments};
use crate::transformer::{CurveTransformer, TransformStats};

/// Result of projecting a sketch onto a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchTransform {
    /// Header lines, untouched
    pub header: Vec<String>,
    /// Rewritten curve region
    pub curve: Vec<Command>,
    /// Footer lines, untouched
    pub footer: Vec<String>,
    /// Deepest interpolated cut depth
    pub z_max: f64,
    /// Height every `JZ` in the curve was raised to
    pub travel_height: f64,
    /// What the curve transform changed
    pub stats: TransformStats,
}

impl SketchTransform {
    /// Output sketch lines in order
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines =
            Vec::with_capacity(self.header.len() + self.curve.len() + self.footer.len());
        lines.extend(self.header.iter().cloned());
        lines.extend(self.curve.iter().map(Command::to_line));
        lines.extend(self.footer.iter().cloned());
        lines
    }
}

/// Transform already segmented sketch regions
pub fn transform_segments(
    segments: SketchSegments,
    profile: &ProfileTable,
    heights: SafetyHeights,
) -> Result<SketchTransform> {
    let SketchSegments {
        header,
        curve,
        footer,
    } = segments;

    let transformed = CurveTransformer::new(profile, heights).transform(curve)?;

    Ok(SketchTransform {
        header,
        curve: transformed.commands,
        footer,
        z_max: transformed.z_max,
        travel_height: heights.fixture_height(transformed.z_max),
        stats: transformed.stats,
    })
}

/// Segment raw sketch lines and transform the curve region
pub fn transform_sketch<I, S>(
    lines: I,
    profile: &ProfileTable,
    heights: SafetyHeights,
) -> Result<SketchTransform>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments = SketchSegmenter::segment(lines)?;
    transform_segments(segments, profile, heights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_footer_pass_through() {
        let profile = ProfileTable::build(vec![(0.0, 0.0), (25.4, 25.4)]).unwrap();
        let lines = [
            "'made with a 2D tool",
            "SA",
            "JZ,0.8",
            "J2,0,0",
            "J3,0.5,0,0",
            "M3,0.5,0,0",
            "J3,0.5,0,0",
            "J2,0,0",
            "JZ,0.8",
            "END",
        ];

        let result = transform_sketch(lines, &profile, SafetyHeights::default()).unwrap();
        let out = result.to_lines();

        assert_eq!(out[0], "'made with a 2D tool");
        assert_eq!(out[1], "SA");
        assert_eq!(out[2], "JZ,1.000000");
        assert_eq!(out[3], "J2,0,0");
        assert_eq!(out[4], "J3,0.500000,0.000000,0.750000");
        assert_eq!(out[5], "M3,0.500000,0.000000,0.500000");
        assert_eq!(out[6], "J2,0,0");
        assert_eq!(out[7], "JZ,0.8");
        assert_eq!(out[8], "END");
        assert_eq!(out.len(), lines.len() - 1);
        assert_eq!(result.z_max, 0.5);
        assert_eq!(result.travel_height, 1.0);
    }
}
