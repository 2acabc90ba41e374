//! Height profile lookup table
//!
//! A profile is a physical part's surface curve, sampled along the X axis
//! and exported as whitespace-separated `position depth` pairs in millimeters
//! (typically the path section of an EPS drawing). [`ProfileTable`] holds the
//! curve in inches with strictly ascending positions and answers depth
//! queries by piecewise-linear interpolation, clamped at both ends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProfileError;
use crate::units::{format_coordinate, mm_to_inches, UNIT_LABEL};

/// PostScript comment marker
const COMMENT_PREFIX: &str = "%";

/// Drawing-termination keyword that ends a path section
const STROKE_PREFIX: &str = "stroke";

/// One sample of the profile curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Position along the X axis
    pub position: f64,
    /// Depth at that position
    pub depth: f64,
}

impl ProfilePoint {
    /// Create a new profile point
    pub fn new(position: f64, depth: f64) -> Self {
        Self { position, depth }
    }
}

impl From<(f64, f64)> for ProfilePoint {
    fn from((position, depth): (f64, f64)) -> Self {
        Self::new(position, depth)
    }
}

/// Extract raw `(position, depth)` pairs from profile source lines
///
/// Blank lines, `%` comments and `stroke` lines are skipped. Only the first
/// two whitespace-separated tokens of the remaining lines are read; values
/// are returned as found, in millimeters.
pub fn parse_profile_points<I, S>(lines: I) -> Result<Vec<ProfilePoint>, ProfileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut points = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) || line.starts_with(STROKE_PREFIX)
        {
            continue;
        }

        let line_number = index + 1;
        let mut tokens = line.split_whitespace();
        let mut next_value = || -> Result<f64, ProfileError> {
            let token = tokens.next().ok_or_else(|| ProfileError::MalformedLine {
                line_number,
                token: line.to_string(),
                reason: "expected two values".to_string(),
            })?;
            let value = token.parse::<f64>().map_err(|e| ProfileError::MalformedLine {
                line_number,
                token: token.to_string(),
                reason: e.to_string(),
            })?;
            if !value.is_finite() {
                return Err(ProfileError::MalformedLine {
                    line_number,
                    token: token.to_string(),
                    reason: "value is not finite".to_string(),
                });
            }
            Ok(value)
        };

        let position = next_value()?;
        let depth = next_value()?;
        points.push(ProfilePoint::new(position, depth));
    }

    Ok(points)
}

/// Ascending, unit-converted profile lookup table
///
/// Built once, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    points: Vec<ProfilePoint>,
}

impl ProfileTable {
    /// Build a table from raw points in millimeters
    ///
    /// The source must already be monotonic in one direction: a descending
    /// sequence is reversed wholesale, never sorted. After reversal positions
    /// must be strictly ascending.
    ///
    /// # Errors
    /// [`ProfileError::InsufficientData`] with fewer than two points,
    /// [`ProfileError::NonMonotonic`] if the positions are not ordered.
    pub fn build<I, P>(raw_points: I) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = P>,
        P: Into<ProfilePoint>,
    {
        let mut points: Vec<ProfilePoint> = raw_points.into_iter().map(Into::into).collect();

        if points.len() < 2 {
            return Err(ProfileError::InsufficientData {
                points: points.len(),
            });
        }

        if points[0].position > points[points.len() - 1].position {
            debug!("Profile is descending, reversing {} points", points.len());
            points.reverse();
        }

        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].position <= pair[0].position {
                return Err(ProfileError::NonMonotonic {
                    index: index + 1,
                    previous: pair[0].position,
                    current: pair[1].position,
                });
            }
        }

        for point in &mut points {
            point.position = mm_to_inches(point.position);
            point.depth = mm_to_inches(point.depth);
        }

        Ok(Self { points })
    }

    /// Parse profile source lines and build the table from them
    pub fn from_lines<I, S>(lines: I) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(parse_profile_points(lines)?)
    }

    /// Linearly interpolated depth at `x`
    ///
    /// Positions outside the table clamp to the nearest boundary depth.
    pub fn interpolate(&self, x: f64) -> f64 {
        // First point strictly to the right of x
        let upper = self.points.partition_point(|p| p.position <= x);

        if upper == 0 {
            return self.points[0].depth;
        }
        if upper == self.points.len() {
            return self.points[upper - 1].depth;
        }

        let left = self.points[upper - 1];
        let right = self.points[upper];
        let t = (x - left.position) / (right.position - left.position);
        left.depth + t * (right.depth - left.depth)
    }

    /// Points in ascending position order
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    /// Number of points in the table
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a built table; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(min, max)` position covered by the table
    pub fn position_range(&self) -> (f64, f64) {
        (self.points[0].position, self.points[self.points.len() - 1].position)
    }

    /// Render the table as CSV lines, header first
    pub fn to_csv_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.points.len() + 1);
        lines.push(format!("position_{UNIT_LABEL},depth_{UNIT_LABEL}"));
        lines.extend(self.points.iter().map(|p| {
            format!(
                "{},{}",
                format_coordinate(p.position),
                format_coordinate(p.depth)
            )
        }));
        lines
    }
}
