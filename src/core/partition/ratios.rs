use serde::{Deserialize, Serialize};

use super::error::{PartitionError, PartitionResult};
use crate::core::dataset::DatasetSplit;

/// Allowed distance between the ratio sum and 1.0 under [`RatioPolicy::Strict`]
pub const RATIO_SUM_TOLERANCE: f64 = 1e-6;

/// What to do when the three ratios do not add up to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioPolicy {
    /// Reject the ratios
    #[default]
    Strict,
    /// Divide each ratio by the sum
    Normalize,
}

/// Target ratios for train/val/test split distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64, // e.g., 0.8 for 80%
    pub val: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            val: 0.0,
            test: 0.2,
        }
    }
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Self {
        Self { train, val, test }
    }

    /// Get the target ratio for a specific split
    pub fn get(&self, split: DatasetSplit) -> f64 {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Val => self.val,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn sum(&self) -> f64 {
        self.train + self.val + self.test
    }

    /// Validate the ratios under `policy`, returning the ratios to split with.
    ///
    /// Negative or non-finite ratios and an all-zero set are always rejected.
    pub fn resolve(&self, policy: RatioPolicy) -> PartitionResult<SplitRatios> {
        for split in DatasetSplit::all() {
            let value = self.get(split);
            if !value.is_finite() || value < 0.0 {
                return Err(PartitionError::InvalidRatios(format!(
                    "{} ratio must be a non-negative number, got {}",
                    split, value
                )));
            }
        }

        let sum = self.sum();
        if sum <= 0.0 {
            return Err(PartitionError::InvalidRatios(
                "ratios must not all be zero".to_string(),
            ));
        }

        match policy {
            RatioPolicy::Strict if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE => {
                Err(PartitionError::InvalidRatios(format!(
                    "train + val + test must equal 1.0, got {} + {} + {} = {}",
                    self.train, self.val, self.test, sum
                )))
            }
            RatioPolicy::Strict => Ok(*self),
            RatioPolicy::Normalize => Ok(SplitRatios {
                train: self.train / sum,
                val: self.val / sum,
                test: self.test / sum,
            }),
        }
    }

    /// Compute the cumulative cut points for a class of `n` images.
    ///
    /// Returns `(train_stop, val_stop)`: shuffled positions below
    /// `train_stop` go to train, below `val_stop` to val, the rest to test.
    /// Rounding happens only at these two boundaries.
    pub fn boundaries(&self, n: usize) -> (usize, usize) {
        let total = n as f64;
        let train_stop = ((total * self.train).floor() as usize).min(n);
        let val_stop = ((total * (self.train + self.val)).floor() as usize).clamp(train_stop, n);
        (train_stop, val_stop)
    }

    /// Which split a shuffled position falls into
    pub fn split_for_position(position: usize, boundaries: (usize, usize)) -> DatasetSplit {
        let (train_stop, val_stop) = boundaries;
        if position < train_stop {
            DatasetSplit::Train
        } else if position < val_stop {
            DatasetSplit::Val
        } else {
            DatasetSplit::Test
        }
    }
}
