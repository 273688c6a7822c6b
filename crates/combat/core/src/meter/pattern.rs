//! Power meter stage layouts.

use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, ErrorSeverity};

/// One cell of a meter layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slice {
    Miss,
    Hit,
    Crit,
}

impl Slice {
    /// Layout character for this slice (`-`, `=`, `X`).
    pub const fn symbol(self) -> char {
        match self {
            Self::Miss => '-',
            Self::Hit => '=',
            Self::Crit => 'X',
        }
    }
}

impl TryFrom<char> for Slice {
    type Error = char;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            '-' => Ok(Self::Miss),
            '=' => Ok(Self::Hit),
            'x' | 'X' => Ok(Self::Crit),
            other => Err(other),
        }
    }
}

/// Errors produced while parsing a meter layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("meter layout has no slices")]
    Empty,

    #[error("unknown meter slice '{symbol}' at column {column}")]
    UnknownSlice { symbol: char, column: usize },
}

impl EngineError for PatternError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "PATTERN_EMPTY",
            Self::UnknownSlice { .. } => "PATTERN_UNKNOWN_SLICE",
        }
    }
}

/// Ordered slice layout for one meter stage.
///
/// Always holds at least one slice.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerMeterPattern {
    slices: Vec<Slice>,
    cursor_speed: f32,
}

impl PowerMeterPattern {
    /// Parses a compact layout such as `"==--XX--=="`.
    pub fn parse(layout: &str, cursor_speed: f32) -> Result<Self, PatternError> {
        let slices = parse_slices(layout)?;
        Ok(Self {
            slices,
            cursor_speed,
        })
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Configured cursor speed (signed).
    #[inline]
    pub fn cursor_speed(&self) -> f32 {
        self.cursor_speed
    }

    /// Number of slices of each kind as `(miss, hit, crit)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.slices
            .iter()
            .fold((0, 0, 0), |(miss, hit, crit), slice| match slice {
                Slice::Miss => (miss + 1, hit, crit),
                Slice::Hit => (miss, hit + 1, crit),
                Slice::Crit => (miss, hit, crit + 1),
            })
    }

    /// Canonical layout string (crits rendered as `X`).
    pub fn layout(&self) -> String {
        self.slices.iter().map(|slice| slice.symbol()).collect()
    }
}

impl fmt::Display for PowerMeterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.layout())
    }
}

fn parse_slices(layout: &str) -> Result<Vec<Slice>, PatternError> {
    let slices = layout
        .chars()
        .enumerate()
        .map(|(column, symbol)| {
            Slice::try_from(symbol).map_err(|symbol| PatternError::UnknownSlice { symbol, column })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if slices.is_empty() {
        return Err(PatternError::Empty);
    }
    Ok(slices)
}

impl FromStr for PowerMeterPattern {
    type Err = PatternError;

    /// Parses a layout with a unit cursor speed.
    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        Self::parse(layout, 1.0)
    }
}
