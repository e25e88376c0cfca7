//! Deterministic group-based k-fold splitter.
//!
//! Whole groups (events) are assigned to folds, never individual rows, so a
//! fold's train and test partitions share no group key. Assignment balances
//! row counts: groups are taken in first-appearance order, stably sorted by
//! size descending, and each goes to the currently smallest fold. The whole
//! procedure is deterministic; there is no shuffling.

use crate::error::{EvalError, Result};
use std::collections::HashMap;

/// Row indices of one fold's partitions, each in ascending row order.
#[derive(Debug, Clone)]
pub struct FoldIndices {
    /// Training rows.
    pub train: Vec<usize>,
    /// Held-out rows.
    pub test: Vec<usize>,
}

/// Group-based k-fold splitter.
#[derive(Debug, Clone, Copy)]
pub struct GroupKFold {
    n_splits: usize,
}

impl GroupKFold {
    /// Create a splitter with the given number of folds.
    pub const fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Partition rows into folds by their group key.
    ///
    /// Fails when there are fewer distinct groups than folds or fewer than
    /// two folds.
    pub fn split(&self, groups: &[String]) -> Result<Vec<FoldIndices>> {
        let mut group_order: Vec<&String> = Vec::new();
        let mut group_index: HashMap<&String, usize> = HashMap::new();
        let mut group_sizes: Vec<usize> = Vec::new();
        let mut row_groups: Vec<usize> = Vec::with_capacity(groups.len());

        for key in groups {
            let idx = *group_index.entry(key).or_insert_with(|| {
                group_order.push(key);
                group_sizes.push(0);
                group_order.len() - 1
            });
            group_sizes[idx] += 1;
            row_groups.push(idx);
        }

        if self.n_splits < 2 || group_order.len() < self.n_splits {
            return Err(EvalError::NotEnoughGroups {
                groups: group_order.len(),
                splits: self.n_splits,
            });
        }

        // Stable sort keeps first-appearance order among equal sizes.
        let mut by_size: Vec<usize> = (0..group_order.len()).collect();
        by_size.sort_by_key(|&idx| std::cmp::Reverse(group_sizes[idx]));

        let mut fold_rows = vec![0usize; self.n_splits];
        let mut group_fold = vec![0usize; group_order.len()];
        for idx in by_size {
            let fold = fold_rows
                .iter()
                .enumerate()
                .min_by_key(|&(_, &rows)| rows)
                .map(|(fold, _)| fold)
                .unwrap_or(0);
            group_fold[idx] = fold;
            fold_rows[fold] += group_sizes[idx];
        }

        let mut folds: Vec<FoldIndices> = (0..self.n_splits)
            .map(|_| FoldIndices {
                train: Vec::new(),
                test: Vec::new(),
            })
            .collect();
        for (row, &group) in row_groups.iter().enumerate() {
            let assigned = group_fold[group];
            for (fold, indices) in folds.iter_mut().enumerate() {
                if fold == assigned {
                    indices.test.push(row);
                } else {
                    indices.train.push(row);
                }
            }
        }
        Ok(folds)
    }
}
