//! K-fold cross-validation splitting

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{KeibaError, Result};

/// One train/validation partition
#[derive(Debug, Clone)]
pub struct CvSplit {
    pub train_indices: Vec<usize>,
    pub valid_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// K-fold splitter with optional seeded shuffle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl Default for KFold {
    fn default() -> Self {
        Self {
            n_splits: 5,
            shuffle: true,
            seed: Some(71),
        }
    }
}

impl KFold {
    /// Create a shuffled k-fold splitter with a fixed seed
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed: Some(seed),
        }
    }

    /// Partition `0..n_samples` into disjoint validation folds whose union
    /// covers every index exactly once.
    pub fn split(&self, n_samples: usize) -> Result<Vec<CvSplit>> {
        if self.n_splits < 2 {
            return Err(KeibaError::ValidationError(
                "n_splits must be at least 2".to_string(),
            ));
        }
        if n_samples < self.n_splits {
            return Err(KeibaError::ValidationError(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = match self.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            indices.shuffle(&mut rng);
        }

        // Spread the remainder over the first folds, matching fold sizes of
        // n/k rounded up then down.
        let fold_sizes: Vec<usize> = (0..self.n_splits)
            .map(|i| {
                let base = n_samples / self.n_splits;
                let remainder = n_samples % self.n_splits;
                if i < remainder {
                    base + 1
                } else {
                    base
                }
            })
            .collect();

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut current = 0;

        for fold_idx in 0..self.n_splits {
            let fold_size = fold_sizes[fold_idx];
            let valid_indices: Vec<usize> = indices[current..current + fold_size].to_vec();
            let train_indices: Vec<usize> = indices[..current]
                .iter()
                .chain(indices[current + fold_size..].iter())
                .copied()
                .collect();

            splits.push(CvSplit {
                train_indices,
                valid_indices,
                fold_idx,
            });

            current += fold_size;
        }

        Ok(splits)
    }
}
