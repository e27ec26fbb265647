//! Vector growth parameters.

use crate::error::VecError;

/// Configuration for a vector's capacity policy.
///
/// Controls the initial slot count and the geometric growth factor.
/// Validated at construction; immutable for the lifetime of the vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VecConfig {
    /// Number of element slots allocated by the constructor.
    ///
    /// Default: `8 * size_of::<usize>()` (64 on 64-bit targets).
    /// Must be at least 1.
    pub initial_capacity: usize,

    /// Multiplier applied to the capacity on each growth step.
    ///
    /// Default: 2. Must be at least 2, otherwise growth never terminates.
    pub growth_factor: usize,
}

impl VecConfig {
    /// Default initial capacity: eight machine words' worth of slots.
    pub const DEFAULT_INITIAL_CAPACITY: usize = std::mem::size_of::<usize>() * 8;

    /// Default geometric growth factor.
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Create a config with the default capacity and growth factor.
    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Replace the initial capacity.
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Replace the growth factor.
    pub const fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Check that the config describes a terminating geometric growth policy.
    pub fn validate(&self) -> Result<(), VecError> {
        if self.initial_capacity == 0 {
            return Err(VecError::InvalidConfig {
                reason: "initial_capacity must be at least 1".into(),
            });
        }
        if self.growth_factor < 2 {
            return Err(VecError::InvalidConfig {
                reason: format!("growth_factor must be at least 2, got {}", self.growth_factor),
            });
        }
        Ok(())
    }

    /// Capacity reached by repeatedly multiplying `current` by the growth
    /// factor until it is at least `target`.
    ///
    /// Returns `current` unchanged if it already covers `target`. A zero
    /// capacity steps to 1 before multiplying. Returns `None` if the
    /// multiplication overflows `usize`.
    pub fn grown_capacity(&self, current: usize, target: usize) -> Option<usize> {
        let mut cap = current;
        while cap < target {
            cap = if cap == 0 {
                1
            } else {
                cap.checked_mul(self.growth_factor)?
            };
        }
        Some(cap)
    }
}

impl Default for VecConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_initial_capacity_is_eight_words() {
        let config = VecConfig::new();
        assert_eq!(
            config.initial_capacity,
            std::mem::size_of::<usize>() * 8
        );
        assert_eq!(config.growth_factor, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_initial_capacity_rejected() {
        let config = VecConfig::new().with_initial_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(VecError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn growth_factor_below_two_rejected() {
        for factor in [0, 1] {
            let config = VecConfig::new().with_growth_factor(factor);
            assert!(matches!(
                config.validate(),
                Err(VecError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn grown_capacity_doubles_until_target() {
        let config = VecConfig::new();
        assert_eq!(config.grown_capacity(64, 65), Some(128));
        assert_eq!(config.grown_capacity(64, 64), Some(64));
        assert_eq!(config.grown_capacity(64, 1000), Some(1024));
        assert_eq!(config.grown_capacity(8, 9), Some(16));
    }

    #[test]
    fn grown_capacity_from_zero_steps_to_one() {
        let config = VecConfig::new();
        assert_eq!(config.grown_capacity(0, 0), Some(0));
        assert_eq!(config.grown_capacity(0, 1), Some(1));
        assert_eq!(config.grown_capacity(0, 5), Some(8));
    }

    #[test]
    fn grown_capacity_overflow_is_none() {
        let config = VecConfig::new();
        assert_eq!(config.grown_capacity(usize::MAX / 2 + 1, usize::MAX), None);
    }

    #[test]
    fn custom_factor_is_applied_repeatedly() {
        let config = VecConfig::new().with_growth_factor(3);
        assert_eq!(config.grown_capacity(4, 13), Some(36));
    }

    proptest! {
        #[test]
        fn grown_capacity_is_smallest_power(
            c0 in 1usize..256,
            factor in 2usize..5,
            target in 0usize..100_000,
        ) {
            let config = VecConfig::new().with_growth_factor(factor);
            let cap = config.grown_capacity(c0, target).unwrap();

            // cap = c0 * factor^k for some k.
            let mut k_cap = c0;
            while k_cap < cap {
                k_cap *= factor;
            }
            prop_assert_eq!(k_cap, cap);
            prop_assert!(cap >= target);
            // Smallest such k: one step fewer would not cover the target.
            if cap > c0 {
                prop_assert!(cap / factor < target);
            }
        }
    }
}
