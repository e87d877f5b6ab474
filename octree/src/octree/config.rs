use crate::error::{OctreeError, OctreeResult};
use crate::pool::DEFAULT_HIGH_WATER_MARK;

const MAX_SUPPORTED_DEPTH: u32 = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Records a leaf holds before it splits.
    pub leaf_capacity: usize,
    /// Leaves at this depth never split and may grow past `leaf_capacity`.
    pub max_depth: u32,
    /// A branch collapses once it holds fewer than `leaf_capacity / collapse_divisor` records.
    pub collapse_divisor: usize,
    pub pool_high_water_mark: usize,
    /// Subtrees smaller than this are rebalanced sequentially inside one job.
    pub parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            leaf_capacity: 64,
            max_depth: 8,
            collapse_divisor: 2,
            pool_high_water_mark: DEFAULT_HIGH_WATER_MARK,
            parallel_threshold: 256,
        }
    }
}

impl Config {
    #[inline(always)]
    pub fn collapse_threshold(&self) -> usize {
        self.leaf_capacity / self.collapse_divisor
    }

    pub fn validate(&self) -> OctreeResult<()> {
        if self.leaf_capacity == 0 {
            return Err(OctreeError::InvalidConfig {
                field: "leaf_capacity",
                reason: "must be at least 1",
            });
        }
        if self.collapse_divisor < 2 {
            return Err(OctreeError::InvalidConfig {
                field: "collapse_divisor",
                reason: "must be at least 2 so collapsing stays below the split threshold",
            });
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(OctreeError::InvalidConfig {
                field: "max_depth",
                reason: "must be at most 32",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collapse_threshold(), 32);
    }

    #[test]
    fn collapse_threshold_stays_below_capacity() {
        for leaf_capacity in [1, 32, 64, 128] {
            for collapse_divisor in [2, 4] {
                let config = Config {
                    leaf_capacity,
                    collapse_divisor,
                    ..Config::default()
                };
                assert!(config.validate().is_ok());
                assert!(config.collapse_threshold() < config.leaf_capacity);
            }
        }
    }

    #[test]
    fn rejects_bad_values() {
        let zero_capacity = Config {
            leaf_capacity: 0,
            ..Config::default()
        };
        assert!(matches!(
            zero_capacity.validate(),
            Err(OctreeError::InvalidConfig {
                field: "leaf_capacity",
                ..
            })
        ));

        let no_hysteresis = Config {
            collapse_divisor: 1,
            ..Config::default()
        };
        assert!(matches!(
            no_hysteresis.validate(),
            Err(OctreeError::InvalidConfig {
                field: "collapse_divisor",
                ..
            })
        ));

        let too_deep = Config {
            max_depth: 40,
            ..Config::default()
        };
        assert!(too_deep.validate().is_err());
    }
}
