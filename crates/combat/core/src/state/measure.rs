use std::fmt;

/// Clamped integer quantity (health, resource) tracked per combatant.
///
/// `current` never exceeds `maximum`; every increase is clamped and every
/// decrease floors at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    current: u32,
    maximum: u32,
}

impl Measure {
    /// Creates a measure at the given maximum (`current = maximum`).
    pub const fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Creates a measure with an explicit current value, clamped to `maximum`.
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    #[inline]
    pub const fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }

    #[inline]
    pub const fn is_full(&self) -> bool {
        self.current == self.maximum
    }

    /// Fraction of the maximum currently held, in `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }

    /// Lowers `current` by `amount`, floored at zero.
    ///
    /// Returns the amount actually removed.
    pub fn decrease(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// Raises `current` by `amount`, clamped at `maximum`.
    ///
    /// Returns the amount actually added.
    pub fn increase(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.maximum - self.current);
        self.current += applied;
        applied
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_current_to_maximum() {
        let measure = Measure::new(150, 100);
        assert_eq!(measure.current(), 100);
        assert!(measure.is_full());
    }

    #[test]
    fn decrease_floors_at_zero() {
        let mut measure = Measure::full(10);
        assert_eq!(measure.decrease(4), 4);
        assert_eq!(measure.decrease(100), 6);
        assert_eq!(measure.current(), 0);
        assert!(measure.is_empty());
    }

    #[test]
    fn increase_clamps_at_maximum() {
        let mut measure = Measure::new(3, 10);
        assert_eq!(measure.increase(5), 5);
        assert_eq!(measure.increase(5), 2);
        assert_eq!(measure.current(), 10);
    }

    #[test]
    fn ratio_handles_zero_maximum() {
        assert_eq!(Measure::full(0).ratio(), 0.0);
        assert_eq!(Measure::new(5, 10).ratio(), 0.5);
    }
}
