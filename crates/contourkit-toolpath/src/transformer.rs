//! Curve transformation
//!
//! Projects a flat curve region onto a [`ProfileTable`] in three stages:
//!
//! 1. Every `M3` cut takes its Z from the profile at its X. The deepest of
//!    these is `Z_max`.
//! 2. Every `JZ` is raised to the fixture travel height, `Z_max` plus the
//!    fixture clearance.
//! 3. `J3` moves are restructured left to right:
//!    - `J3` before an `M3` becomes a local plunge to just above that cut;
//!    - a `J3`,`J3` pair becomes retract and travel at the fixture height,
//!      followed by an inserted copy of the second `J3` that descends to just
//!      above the next cut;
//!    - a `J3` before anything else is the terminal retract. It is dropped and
//!      the rest of the curve passes through untouched.

use contourkit_core::{Command, ProfileTable, Result, SafetyHeights, SketchError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Counters describing what a transform changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    /// `M3` commands whose depth was interpolated
    pub cuts: usize,
    /// `JZ` commands raised to the fixture travel height
    pub retracts_to_height: usize,
    /// `J3` commands turned into local plunges
    pub plunges: usize,
    /// `J3`,`J3` travel pairs expanded
    pub travel_pairs: usize,
    /// Commands inserted by pair expansion
    pub inserted: usize,
    /// Commands removed (the terminal retract)
    pub removed: usize,
}

/// A rewritten curve region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedCurve {
    /// Rewritten commands
    pub commands: Vec<Command>,
    /// Deepest interpolated cut depth
    pub z_max: f64,
    /// What changed
    pub stats: TransformStats,
}

/// Rewrites curve commands against a height profile
#[derive(Debug, Clone, Copy)]
pub struct CurveTransformer<'a> {
    profile: &'a ProfileTable,
    heights: SafetyHeights,
}

impl<'a> CurveTransformer<'a> {
    /// Create a transformer borrowing `profile`
    pub fn new(profile: &'a ProfileTable, heights: SafetyHeights) -> Self {
        Self { profile, heights }
    }

    /// Run all three stages over `curve`
    ///
    /// # Errors
    /// [`SketchError::StructuralInvariant`] if the curve does not open with
    /// `JZ`,`J2`, has no cut, or never reaches a terminal retract.
    pub fn transform(&self, mut curve: Vec<Command>) -> Result<TransformedCurve> {
        check_opening(&curve)?;

        let mut stats = TransformStats::default();
        let z_max = self.interpolate_depths(&mut curve, &mut stats)?;
        self.raise_retracts(&mut curve, z_max, &mut stats)?;
        let commands = self.restructure_plunges(curve, z_max, &mut stats)?;

        info!(
            z_max,
            travel_height = self.heights.fixture_height(z_max),
            cuts = stats.cuts,
            inserted = stats.inserted,
            removed = stats.removed,
            "Curve transformed"
        );

        Ok(TransformedCurve {
            commands,
            z_max,
            stats,
        })
    }

    /// Stage 1: interpolate every cut depth, returning `Z_max`
    pub fn interpolate_depths(
        &self,
        curve: &mut [Command],
        stats: &mut TransformStats,
    ) -> Result<f64> {
        let mut z_max = f64::NEG_INFINITY;

        for command in curve.iter_mut().filter(|c| c.is_cut()) {
            let x = command.x().ok_or_else(|| {
                SketchError::structural(format!("cut command without X: {}", command))
            })?;
            let z = self.profile.interpolate(x);
            command.set_depth(z)?;
            z_max = z_max.max(z);
            stats.cuts += 1;
        }

        if stats.cuts == 0 {
            return Err(SketchError::structural("curve contains no cut commands").into());
        }

        debug!(cuts = stats.cuts, z_max, "Cut depths interpolated");
        Ok(z_max)
    }

    /// Stage 2: raise every `JZ` to the fixture travel height
    pub fn raise_retracts(
        &self,
        curve: &mut [Command],
        z_max: f64,
        stats: &mut TransformStats,
    ) -> Result<()> {
        let travel = self.heights.fixture_height(z_max);
        for command in curve.iter_mut().filter(|c| c.is_retract_to_height()) {
            command.set_depth(travel)?;
            stats.retracts_to_height += 1;
        }
        Ok(())
    }

    /// Stage 3: restructure `J3` moves into the two-tier height scheme
    pub fn restructure_plunges(
        &self,
        curve: Vec<Command>,
        z_max: f64,
        stats: &mut TransformStats,
    ) -> Result<Vec<Command>> {
        let travel = self.heights.fixture_height(z_max);
        let mut output = Vec::with_capacity(curve.len() + 4);
        let mut commands = curve.into_iter().peekable();
        let mut terminated = false;

        while let Some(mut command) = commands.next() {
            if !command.is_plunge() {
                output.push(command);
                continue;
            }

            if let Some(mut travel_move) = commands.next_if(Command::is_plunge) {
                command.set_depth(travel)?;
                travel_move.set_depth(travel)?;

                let mut approach = travel_move.clone();
                let cut_depth = next_cut_depth(commands.peek(), &travel_move)?;
                approach.set_depth(self.heights.material_height(cut_depth))?;

                output.extend([command, travel_move, approach]);
                stats.travel_pairs += 1;
                stats.inserted += 1;
                continue;
            }

            match commands.peek().filter(|next| next.is_cut()).map(Command::depth) {
                Some(Some(cut_depth)) => {
                    command.set_depth(self.heights.material_height(cut_depth))?;
                    output.push(command);
                    stats.plunges += 1;
                }
                Some(None) => {
                    return Err(SketchError::structural(format!(
                        "cut command after {} has no Z",
                        command
                    ))
                    .into());
                }
                None => {
                    debug!(line = ?command.line_number(), "Dropping terminal retract");
                    stats.removed += 1;
                    terminated = true;
                    output.extend(commands);
                    break;
                }
            }
        }

        if !terminated {
            return Err(SketchError::structural("curve ends without a terminal J3 retract").into());
        }

        Ok(output)
    }
}

/// Depth of the cut that must follow `after`
fn next_cut_depth(next: Option<&Command>, after: &Command) -> Result<f64> {
    match next {
        Some(cut) if cut.is_cut() => cut.depth().ok_or_else(|| {
            SketchError::structural(format!("cut command without Z: {}", cut)).into()
        }),
        Some(other) => Err(SketchError::structural(format!(
            "expected M3 after {}, found {}",
            after,
            other.opcode()
        ))
        .into()),
        None => {
            Err(SketchError::structural(format!("expected M3 after {}, found end", after)).into())
        }
    }
}

/// The curve must open with `JZ` immediately followed by `J2`
fn check_opening(curve: &[Command]) -> Result<()> {
    let opens = matches!(
        curve,
        [first, second, ..] if first.is_retract_to_height() && second.is_curve_marker()
    );
    if opens {
        Ok(())
    } else {
        Err(SketchError::structural("curve must open with JZ followed by J2").into())
    }
}
