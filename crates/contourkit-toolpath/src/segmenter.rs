//! Sketch segmentation
//!
//! Splits a sketch into three regions in a single forward pass:
//! - header: opaque lines before the first `JZ`
//! - curve: the `JZ`, the `J2` that always follows it, and every command up
//!   to and including the next `J2`
//! - footer: opaque lines after that
//!
//! Only curve lines are parsed into [`Command`]s. Blank lines inside the
//! curve region carry no instruction and are dropped.

use contourkit_core::{Command, Error, Opcode, Result, SketchError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmenterState {
    /// Collecting header lines, waiting for the first `JZ`
    Header,
    /// `JZ` seen, the next line opens the curve
    CurveOpen,
    /// Collecting curve commands until the closing `J2`
    CurveBody,
    /// Curve closed, everything else is footer
    Footer,
}

/// A sketch split into header, curve and footer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SketchSegments {
    /// Lines preceding the curve, untouched
    pub header: Vec<String>,
    /// Parsed curve commands
    pub curve: Vec<Command>,
    /// Lines following the curve, untouched
    pub footer: Vec<String>,
}

impl SketchSegments {
    /// Total number of lines/commands across all regions
    pub fn len(&self) -> usize {
        self.header.len() + self.curve.len() + self.footer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One-pass sketch segmenter
#[derive(Debug)]
pub struct SketchSegmenter {
    state: SegmenterState,
    segments: SketchSegments,
    lines_read: usize,
}

impl Default for SketchSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchSegmenter {
    /// Create a segmenter positioned before the first line
    pub fn new() -> Self {
        Self {
            state: SegmenterState::Header,
            segments: SketchSegments::default(),
            lines_read: 0,
        }
    }

    /// Segment a whole sketch
    ///
    /// # Errors
    /// [`SketchError::Truncated`] if input ends before the closing `J2`,
    /// [`SketchError::StructuralInvariant`] if the `JZ` is not followed by `J2`,
    /// or any [`contourkit_core::CommandError`] raised while parsing curve lines.
    pub fn segment<I, S>(lines: I) -> Result<SketchSegments>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segmenter = Self::new();
        for line in lines {
            segmenter.push_line(line.as_ref())?;
        }
        segmenter.finish()
    }

    /// Feed the next sketch line
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.lines_read += 1;
        let line_number = self.lines_read;

        match self.state {
            SegmenterState::Header => {
                if Opcode::of_line(line) == Opcode::RetractToHeight {
                    debug!("Curve region opens at line {}", line_number);
                    self.segments.curve.push(Command::parse(line, line_number)?);
                    self.state = SegmenterState::CurveOpen;
                } else {
                    self.segments.header.push(line.to_string());
                }
            }
            SegmenterState::CurveOpen => {
                if line.trim().is_empty() {
                    return Ok(());
                }
                let command = Command::parse(line, line_number)?;
                if !command.is_curve_marker() {
                    return Err(SketchError::structural(format!(
                        "expected J2 after the opening JZ at line {}, found {}",
                        line_number,
                        command.opcode()
                    ))
                    .into());
                }
                self.segments.curve.push(command);
                self.state = SegmenterState::CurveBody;
            }
            SegmenterState::CurveBody => {
                if line.trim().is_empty() {
                    return Ok(());
                }
                let command = Command::parse(line, line_number)?;
                let closes = command.is_curve_marker();
                self.segments.curve.push(command);
                if closes {
                    debug!("Curve region closes at line {}", line_number);
                    self.state = SegmenterState::Footer;
                }
            }
            SegmenterState::Footer => {
                self.segments.footer.push(line.to_string());
            }
        }

        Ok(())
    }

    /// Finish segmentation once input is exhausted
    pub fn finish(self) -> Result<SketchSegments> {
        let reason = match self.state {
            SegmenterState::Footer => {
                debug!(
                    header = self.segments.header.len(),
                    curve = self.segments.curve.len(),
                    footer = self.segments.footer.len(),
                    "Sketch segmented"
                );
                return Ok(self.segments);
            }
            SegmenterState::Header => "no JZ command opens a curve region",
            SegmenterState::CurveOpen => "input ended right after the opening JZ",
            SegmenterState::CurveBody => "closing J2 never reached",
        };

        Err(Error::from(SketchError::Truncated {
            lines_read: self.lines_read,
            reason: reason.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contourkit_core::CommandError;

    const SKETCH: &[&str] = &[
        "'Header comment",
        "SA",
        "MS,2.0,1.0",
        "JZ,0.6",
        "J2,0,0",
        "J3,1,1,0.2",
        "M3,1,1,-0.1",
        "M3,2,1,-0.1",
        "J3,2,1,0.2",
        "J2,0,0",
        "JZ,1.0",
        "END",
    ];

    #[test]
    fn test_segment_regions() {
        let segments = SketchSegmenter::segment(SKETCH).unwrap();
        assert_eq!(segments.header, vec!["'Header comment", "SA", "MS,2.0,1.0"]);
        assert_eq!(segments.curve.len(), 7);
        assert_eq!(segments.footer, vec!["JZ,1.0", "END"]);
        assert_eq!(segments.len(), SKETCH.len());

        assert!(segments.curve[0].is_retract_to_height());
        assert!(segments.curve[1].is_curve_marker());
        assert!(segments.curve[6].is_curve_marker());
        assert_eq!(segments.curve[3].line_number(), Some(7));
    }

    #[test]
    fn test_footer_jz_stays_opaque() {
        let segments = SketchSegmenter::segment(SKETCH).unwrap();
        let curve_jz = segments
            .curve
            .iter()
            .filter(|c| c.is_retract_to_height())
            .count();
        assert_eq!(curve_jz, 1);
    }

    #[test]
    fn test_blank_curve_lines_are_skipped() {
        let lines = ["JZ,1", "J2,0,0", "", "M3,0,0,0", "   ", "J2,0,0"];
        let segments = SketchSegmenter::segment(lines).unwrap();
        assert_eq!(segments.curve.len(), 4);
    }

    #[test]
    fn test_blank_line_after_opening_jz_is_skipped() {
        let lines = ["SA", "JZ,1", "", "J2,0,0", "M3,0,0,0", "J2,0,0"];
        let segments = SketchSegmenter::segment(lines).unwrap();
        assert_eq!(segments.header, vec!["SA"]);
        assert_eq!(segments.curve.len(), 4);
        assert!(segments.curve[1].is_curve_marker());
        assert_eq!(segments.curve[1].line_number(), Some(4));
    }

    #[test]
    fn test_truncated_without_curve() {
        let err = SketchSegmenter::segment(["SA", "MS,1,1"]).unwrap_err();
        assert!(matches!(
            err,
            Error::Sketch(SketchError::Truncated { lines_read: 2, .. })
        ));
    }

    #[test]
    fn test_truncated_after_opening_jz() {
        let err = SketchSegmenter::segment(["SA", "JZ,1"]).unwrap_err();
        assert!(matches!(err, Error::Sketch(SketchError::Truncated { .. })));
    }

    #[test]
    fn test_truncated_before_closing_marker() {
        let err = SketchSegmenter::segment(["JZ,1", "J2,0,0", "M3,0,0,0"]).unwrap_err();
        match err {
            Error::Sketch(SketchError::Truncated { lines_read, reason }) => {
                assert_eq!(lines_read, 3);
                assert!(reason.contains("J2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_opening_jz_must_be_followed_by_j2() {
        let err = SketchSegmenter::segment(["JZ,1", "M3,0,0,0", "J2,0,0"]).unwrap_err();
        assert!(matches!(
            err,
            Error::Sketch(SketchError::StructuralInvariant { .. })
        ));
    }

    #[test]
    fn test_malformed_curve_line_reports_position() {
        let err = SketchSegmenter::segment(["SA", "JZ,1", "J2,0,0", "M3,0,x,0", "J2,0,0"])
            .unwrap_err();
        match err {
            Error::Command(CommandError::Malformed { line_number, token }) => {
                assert_eq!(line_number, 4);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_lines_are_not_parsed() {
        let segments =
            SketchSegmenter::segment(["VD,,,,abc", "JZ,1", "J2,0,0", "J2,0,0"]).unwrap();
        assert_eq!(segments.header, vec!["VD,,,,abc"]);
        assert_eq!(segments.curve.len(), 3);
        assert!(segments.footer.is_empty());
    }
}
