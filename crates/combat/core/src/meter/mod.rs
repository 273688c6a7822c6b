//! Power meter: a timing skill check that scales an attack.
//!
//! A cursor bounces across the current pattern's slices. Each confirm reads
//! the slice under the cursor and folds it into a cumulative damage
//! modifier; then the meter either moves on to the next (narrower, faster)
//! pattern or reports that the attack should resolve.
//!
//! - MISS on the first pattern zeroes the modifier for the whole attack.
//!   MISS on later patterns is forgiven.
//! - CRIT multiplies the modifier by the crit multiplier (1.5).
//! - HIT is neutral unless [`MeterRules::hit_bonus`] is set, in which case
//!   it multiplies on every pattern after the first.

mod pattern;

pub use pattern::{PatternError, PowerMeterPattern, Slice};

use crate::config::MeterRules;
use crate::error::{EngineError, ErrorSeverity};

/// Result of confirming the cursor on one pattern.
pub type MeterResult = Slice;

/// Errors produced while building a power meter.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MeterError {
    #[error("power meter needs at least one pattern")]
    NoPatterns,

    #[error("power meter width must be positive and finite (got {0})")]
    InvalidWidth(f32),

    #[error("pattern {index} cursor speed must be finite (got {speed})")]
    InvalidSpeed { index: usize, speed: f32 },

    #[error("{name} must be finite and non-negative (got {value})")]
    InvalidMultiplier { name: &'static str, value: f32 },

    #[error("pattern {index} is invalid: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternError,
    },
}

impl EngineError for MeterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPatterns => "METER_NO_PATTERNS",
            Self::InvalidWidth(_) => "METER_INVALID_WIDTH",
            Self::InvalidSpeed { .. } => "METER_INVALID_SPEED",
            Self::InvalidMultiplier { .. } => "METER_INVALID_MULTIPLIER",
            Self::Pattern { .. } => "METER_INVALID_PATTERN",
        }
    }
}

/// Multi-stage timing check driven by elapsed frame time.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerMeter {
    patterns: Vec<PowerMeterPattern>,
    width: f32,
    crit_multiplier: f32,
    hit_bonus: Option<f32>,

    current_pattern_index: usize,
    cursor_position: f32,
    cursor_speed: f32,
    damage_modifier: f32,
    results: Vec<MeterResult>,
    active: bool,
}

impl PowerMeter {
    /// Builds a meter from already-parsed patterns.
    pub fn new(patterns: Vec<PowerMeterPattern>, rules: &MeterRules) -> Result<Self, MeterError> {
        if patterns.is_empty() {
            return Err(MeterError::NoPatterns);
        }
        // The bounce period is twice the width and must stay finite too.
        if !(rules.width * 2.0).is_finite() || rules.width <= 0.0 {
            return Err(MeterError::InvalidWidth(rules.width));
        }
        if let Some((index, pattern)) = patterns
            .iter()
            .enumerate()
            .find(|(_, pattern)| !pattern.cursor_speed().is_finite())
        {
            return Err(MeterError::InvalidSpeed {
                index,
                speed: pattern.cursor_speed(),
            });
        }
        check_multiplier("crit_multiplier", rules.crit_multiplier)?;
        if let Some(bonus) = rules.hit_bonus {
            check_multiplier("hit_bonus", bonus)?;
        }

        let cursor_speed = patterns[0].cursor_speed();
        Ok(Self {
            patterns,
            width: rules.width,
            crit_multiplier: rules.crit_multiplier,
            hit_bonus: rules.hit_bonus,
            current_pattern_index: 0,
            cursor_position: 0.0,
            cursor_speed,
            damage_modifier: 1.0,
            results: Vec::new(),
            active: false,
        })
    }

    /// Parses the rule set's pattern layouts and builds a meter.
    pub fn from_rules(rules: &MeterRules) -> Result<Self, MeterError> {
        let layouts: Vec<(&str, f32)> = rules
            .patterns
            .iter()
            .map(|spec| (spec.layout.as_str(), spec.speed))
            .collect();
        Self::from_layouts(&layouts, rules)
    }

    /// Builds a meter from `(layout, speed)` pairs, ignoring `rules.patterns`.
    pub fn from_layouts(layouts: &[(&str, f32)], rules: &MeterRules) -> Result<Self, MeterError> {
        let patterns = layouts
            .iter()
            .enumerate()
            .map(|(index, (layout, speed))| {
                PowerMeterPattern::parse(layout, *speed)
                    .map_err(|source| MeterError::Pattern { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(patterns, rules)
    }

    // ===== queries =====

    pub fn patterns(&self) -> &[PowerMeterPattern] {
        &self.patterns
    }

    pub fn current_pattern(&self) -> &PowerMeterPattern {
        &self.patterns[self.current_pattern_index]
    }

    #[inline]
    pub fn current_pattern_index(&self) -> usize {
        self.current_pattern_index
    }

    #[inline]
    pub fn is_first_pattern(&self) -> bool {
        self.current_pattern_index == 0
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn cursor_position(&self) -> f32 {
        self.cursor_position
    }

    #[inline]
    pub fn cursor_speed(&self) -> f32 {
        self.cursor_speed
    }

    #[inline]
    pub fn damage_modifier(&self) -> f32 {
        self.damage_modifier
    }

    /// Results confirmed since the last reset, in stage order.
    pub fn results(&self) -> &[MeterResult] {
        &self.results
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Width of one slice of the current pattern.
    pub fn slice_width(&self) -> f32 {
        self.width / self.current_pattern().len() as f32
    }

    /// Index of the slice under the cursor, clamped to the last slice.
    pub fn slice_index_at_cursor(&self) -> usize {
        let last = self.current_pattern().len() - 1;
        let index = (self.cursor_position / self.slice_width()).floor();
        (index.max(0.0) as usize).min(last)
    }

    pub fn slice_at_cursor(&self) -> Slice {
        self.current_pattern().slices()[self.slice_index_at_cursor()]
    }

    // ===== lifecycle =====

    /// Starts accepting `update` ticks.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Returns to the first pattern with a neutral modifier and the cursor at 0.
    pub fn reset(&mut self) {
        self.current_pattern_index = 0;
        self.cursor_position = 0.0;
        self.cursor_speed = self.patterns[0].cursor_speed();
        self.damage_modifier = 1.0;
        self.results.clear();
        self.active = false;
    }

    /// Moves the cursor by `cursor_speed * dt`, reflecting off both ends.
    pub fn update(&mut self, dt: f32) {
        if !self.active || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let target = self.cursor_position + self.cursor_speed * dt;
        if !target.is_finite() {
            tracing::warn!(dt, speed = self.cursor_speed, "power meter step overflowed, tick dropped");
            return;
        }

        let period = self.width * 2.0;
        let unfolded = target.rem_euclid(period);
        if unfolded <= self.width {
            self.cursor_position = unfolded;
        } else {
            // Odd number of bounces: mirrored position, reversed direction.
            self.cursor_position = period - unfolded;
            self.cursor_speed = -self.cursor_speed;
        }
    }

    /// Reads the slice under the cursor and folds it into the damage modifier.
    pub fn confirm_cursor(&mut self) -> MeterResult {
        let result = self.slice_at_cursor();
        match result {
            Slice::Miss if self.is_first_pattern() => self.damage_modifier = 0.0,
            Slice::Miss => {}
            Slice::Crit => self.damage_modifier *= self.crit_multiplier,
            Slice::Hit => {
                if let Some(bonus) = self.hit_bonus
                    && !self.is_first_pattern()
                {
                    self.damage_modifier *= bonus;
                }
            }
        }
        self.results.push(result);

        tracing::debug!(
            stage = self.current_pattern_index,
            ?result,
            modifier = self.damage_modifier,
            "power meter confirmed"
        );
        result
    }

    /// Moves to the next pattern if there is one.
    ///
    /// The cursor keeps its direction of travel and takes the next pattern's
    /// speed magnitude. Returns `false` on the final pattern, meaning the
    /// attack should resolve with [`damage_modifier`](Self::damage_modifier).
    pub fn advance(&mut self) -> bool {
        let next = self.current_pattern_index + 1;
        if next >= self.patterns.len() {
            return false;
        }

        self.current_pattern_index = next;
        let configured = self.patterns[next].cursor_speed();
        self.cursor_speed = if self.cursor_speed == 0.0 {
            configured
        } else {
            configured.abs().copysign(self.cursor_speed)
        };
        true
    }
}

fn check_multiplier(name: &'static str, value: f32) -> Result<(), MeterError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MeterError::InvalidMultiplier { name, value })
    }
}
