//! Sketch command types
//!
//! A sketch is a ShopBot part file: one instruction per line, an opcode
//! followed by comma-separated numeric arguments (`M3,1.25,0.5,-0.125`).
//! Only four opcodes carry meaning for profile projection; everything else
//! is kept as an opaque [`Opcode::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommandError;
use crate::units::format_coordinate;

/// Separator between opcode and arguments
pub const DELIMITER: char = ',';

/// Instruction class of a sketch command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// `JZ` - jog Z to an absolute height
    RetractToHeight,
    /// `J2` - jog in XY; brackets the curve region
    CurveMarker,
    /// `M3` - cutting move in X, Y and Z
    Cut,
    /// `J3` - jog in X, Y and Z; plunges toward or retracts from a cut
    Plunge,
    /// Any other opcode, passed through untouched
    Other(String),
}

impl Opcode {
    /// Classify an opcode token (case-insensitive)
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("JZ") {
            Self::RetractToHeight
        } else if token.eq_ignore_ascii_case("J2") {
            Self::CurveMarker
        } else if token.eq_ignore_ascii_case("M3") {
            Self::Cut
        } else if token.eq_ignore_ascii_case("J3") {
            Self::Plunge
        } else {
            Self::Other(token.to_string())
        }
    }

    /// Classify the opcode of a raw sketch line without parsing its arguments
    pub fn of_line(line: &str) -> Self {
        let token = line.split(DELIMITER).next().unwrap_or_default();
        Self::from_token(token)
    }

    /// Canonical token
    pub fn token(&self) -> &str {
        match self {
            Self::RetractToHeight => "JZ",
            Self::CurveMarker => "J2",
            Self::Cut => "M3",
            Self::Plunge => "J3",
            Self::Other(token) => token,
        }
    }

    /// Required argument count, if the opcode has a fixed one
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::RetractToHeight => Some(1),
            Self::Cut | Self::Plunge => Some(3),
            Self::CurveMarker | Self::Other(_) => None,
        }
    }

    /// Index of the Z argument for opcodes that carry one
    pub fn depth_index(&self) -> Option<usize> {
        match self {
            Self::RetractToHeight => Some(0),
            Self::Cut | Self::Plunge => Some(2),
            Self::CurveMarker | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One parsed sketch instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    opcode: Opcode,
    args: Vec<f64>,
    /// Source text, kept until the command is modified
    source: Option<String>,
    /// 1-based line number in the sketch, if parsed from one
    line_number: Option<usize>,
}

impl Command {
    /// Create a command from an opcode and arguments
    pub fn new(opcode: Opcode, args: Vec<f64>) -> Self {
        Self {
            opcode,
            args,
            source: None,
            line_number: None,
        }
    }

    /// Parse a sketch line
    ///
    /// # Errors
    /// [`CommandError::Malformed`] if an argument is not a finite number,
    /// [`CommandError::ArityMismatch`] if a fixed-arity opcode has the wrong
    /// number of arguments.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, CommandError> {
        let line = line.trim();
        let mut tokens = line.split(DELIMITER);
        let opcode = Opcode::from_token(tokens.next().unwrap_or_default());

        let args = tokens
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| CommandError::Malformed {
                        line_number,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(expected) = opcode.arity() {
            if args.len() != expected {
                return Err(CommandError::ArityMismatch {
                    line_number,
                    opcode: opcode.token().to_string(),
                    expected,
                    actual: args.len(),
                });
            }
        }

        Ok(Self {
            opcode,
            args,
            source: Some(line.to_string()),
            line_number: Some(line_number),
        })
    }

    /// Render in canonical form: six decimals per argument
    pub fn format(&self) -> String {
        let mut out = self.opcode.token().to_string();
        for arg in &self.args {
            out.push(DELIMITER);
            out.push_str(&format_coordinate(*arg));
        }
        out
    }

    /// Output text: the source line if unmodified, canonical form otherwise
    pub fn to_line(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => self.format(),
        }
    }

    /// Copy of this command with the argument at `index` replaced
    pub fn with_argument(&self, index: usize, value: f64) -> Result<Self, CommandError> {
        let mut command = self.clone();
        command.set_argument(index, value)?;
        Ok(command)
    }

    /// Replace the argument at `index` in place
    pub fn set_argument(&mut self, index: usize, value: f64) -> Result<(), CommandError> {
        let arity = self.args.len();
        let slot = self
            .args
            .get_mut(index)
            .ok_or_else(|| CommandError::ArgumentOutOfRange {
                opcode: self.opcode.token().to_string(),
                index,
                arity,
            })?;
        *slot = value;
        self.source = None;
        Ok(())
    }

    /// Z argument, for opcodes that carry one
    pub fn depth(&self) -> Option<f64> {
        self.opcode
            .depth_index()
            .and_then(|index| self.args.get(index).copied())
    }

    /// Replace the Z argument in place
    pub fn set_depth(&mut self, value: f64) -> Result<(), CommandError> {
        let index = self
            .opcode
            .depth_index()
            .ok_or_else(|| CommandError::ArgumentOutOfRange {
                opcode: self.opcode.token().to_string(),
                index: 0,
                arity: 0,
            })?;
        self.set_argument(index, value)
    }

    /// X argument of an XYZ move
    pub fn x(&self) -> Option<f64> {
        match self.opcode {
            Opcode::Cut | Opcode::Plunge => self.args.first().copied(),
            _ => None,
        }
    }

    /// Y argument of an XYZ move
    pub fn y(&self) -> Option<f64> {
        match self.opcode {
            Opcode::Cut | Opcode::Plunge => self.args.get(1).copied(),
            _ => None,
        }
    }

    pub fn opcode(&self) -> &Opcode {
        &self.opcode
    }

    pub fn args(&self) -> &[f64] {
        &self.args
    }

    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    /// Whether the command still renders as its source text
    pub fn is_pristine(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_cut(&self) -> bool {
        self.opcode == Opcode::Cut
    }

    pub fn is_plunge(&self) -> bool {
        self.opcode == Opcode::Plunge
    }

    pub fn is_retract_to_height(&self) -> bool {
        self.opcode == Opcode::RetractToHeight
    }

    pub fn is_curve_marker(&self) -> bool {
        self.opcode == Opcode::CurveMarker
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_classification() {
        assert_eq!(Opcode::from_token("JZ"), Opcode::RetractToHeight);
        assert_eq!(Opcode::from_token(" jz "), Opcode::RetractToHeight);
        assert_eq!(Opcode::from_token("J2"), Opcode::CurveMarker);
        assert_eq!(Opcode::from_token("M3"), Opcode::Cut);
        assert_eq!(Opcode::from_token("J3"), Opcode::Plunge);
        assert_eq!(Opcode::from_token("MS"), Opcode::Other("MS".to_string()));
        assert_eq!(Opcode::of_line("M3,1,2,3"), Opcode::Cut);
        assert_eq!(Opcode::of_line("'comment"), Opcode::Other("'comment".to_string()));
    }

    #[test]
    fn test_parse_cut() {
        let cmd = Command::parse("M3,1.5,2.25,-0.125", 4).unwrap();
        assert!(cmd.is_cut());
        assert_eq!(cmd.args(), &[1.5, 2.25, -0.125]);
        assert_eq!(cmd.x(), Some(1.5));
        assert_eq!(cmd.y(), Some(2.25));
        assert_eq!(cmd.depth(), Some(-0.125));
        assert_eq!(cmd.line_number(), Some(4));
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        let cmd = Command::parse("  J3, 1.0 , 2.0,3.0  ", 1).unwrap();
        assert!(cmd.is_plunge());
        assert_eq!(cmd.args(), &[1.0, 2.0, 3.0]);
        assert_eq!(cmd.to_line(), "J3, 1.0 , 2.0,3.0");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = Command::parse("M3,1.0,abc,0", 9).unwrap_err();
        assert_eq!(
            err,
            CommandError::Malformed {
                line_number: 9,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        for (line, token) in [
            ("J3,NaN,0,0", "NaN"),
            ("M3,inf,0,0", "inf"),
            ("M3,0,-infinity,0", "-infinity"),
            ("JZ,nan", "nan"),
        ] {
            let err = Command::parse(line, 4).unwrap_err();
            assert_eq!(
                err,
                CommandError::Malformed {
                    line_number: 4,
                    token: token.to_string()
                },
                "{line}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        let err = Command::parse("JZ,1,2", 3).unwrap_err();
        assert_eq!(
            err,
            CommandError::ArityMismatch {
                line_number: 3,
                opcode: "JZ".to_string(),
                expected: 1,
                actual: 2,
            }
        );

        // J2 has no fixed arity
        assert!(Command::parse("J2,0,0", 1).is_ok());
        assert!(Command::parse("J2,0,0,0", 1).is_ok());
    }

    #[test]
    fn test_format_six_decimals() {
        let cmd = Command::new(Opcode::Cut, vec![1.0, 0.5, 1.0 / 3.0]);
        assert_eq!(cmd.format(), "M3,1.000000,0.500000,0.333333");

        let cmd = Command::new(Opcode::Other("SO".to_string()), vec![]);
        assert_eq!(cmd.format(), "SO");
    }

    #[test]
    fn test_format_is_stable() {
        let cmd = Command::new(Opcode::Plunge, vec![0.1234567, 2.0, -3.3333333]);
        let formatted = cmd.format();
        let reparsed = Command::parse(&formatted, 1).unwrap();
        assert_eq!(reparsed.format(), formatted);
    }

    #[test]
    fn test_to_line_preserves_source_until_modified() {
        let cmd = Command::parse("M3,1,2,3", 1).unwrap();
        assert!(cmd.is_pristine());
        assert_eq!(cmd.to_line(), "M3,1,2,3");

        let updated = cmd.with_argument(2, 0.25).unwrap();
        assert!(!updated.is_pristine());
        assert_eq!(updated.to_line(), "M3,1.000000,2.000000,0.250000");
        // original untouched
        assert_eq!(cmd.depth(), Some(3.0));
    }

    #[test]
    fn test_with_argument_out_of_range() {
        let cmd = Command::parse("JZ,0.5", 1).unwrap();
        let err = cmd.with_argument(1, 2.0).unwrap_err();
        assert_eq!(
            err,
            CommandError::ArgumentOutOfRange {
                opcode: "JZ".to_string(),
                index: 1,
                arity: 1,
            }
        );
    }

    #[test]
    fn test_set_depth() {
        let mut jz = Command::parse("JZ,0", 1).unwrap();
        jz.set_depth(0.75).unwrap();
        assert_eq!(jz.args(), &[0.75]);

        let mut j3 = Command::parse("J3,1,2,3", 2).unwrap();
        j3.set_depth(0.5).unwrap();
        assert_eq!(j3.args(), &[1.0, 2.0, 0.5]);

        let mut j2 = Command::parse("J2,0,0", 3).unwrap();
        assert!(j2.set_depth(1.0).is_err());
    }
}
