//! Positive item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A quantity of one product, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single item.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Create a quantity from a signed value, returning `None` below 1.
    ///
    /// Values above `u32::MAX` saturate.
    #[must_use]
    pub fn from_signed(value: i64) -> Option<Self> {
        if value < 1 {
            return None;
        }
        Self::new(u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add another quantity, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }

    /// Apply a signed step, never going below 1.
    #[must_use]
    pub fn step(self, delta: i64) -> Self {
        Self::from_signed(i64::from(self.get()).saturating_add(delta)).unwrap_or(Self::ONE)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_a_quantity() {
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::from_signed(0).is_none());
        assert!(Quantity::from_signed(-3).is_none());
    }

    #[test]
    fn test_default_is_one() {
        assert_eq!(Quantity::default().get(), 1);
    }

    #[test]
    fn test_step_never_drops_below_one() {
        let q = Quantity::new(2).unwrap();
        assert_eq!(q.step(1).get(), 3);
        assert_eq!(q.step(-1).get(), 1);
        assert_eq!(q.step(-5).get(), 1);
    }

    #[test]
    fn test_saturating_add() {
        let big = Quantity::new(u32::MAX).unwrap();
        assert_eq!(big.saturating_add(Quantity::ONE).get(), u32::MAX);
        assert_eq!(Quantity::ONE.saturating_add(Quantity::ONE).get(), 2);
    }

    #[test]
    fn test_from_signed_saturates() {
        assert_eq!(Quantity::from_signed(i64::MAX).unwrap().get(), u32::MAX);
    }
}
