// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window-style ranking functions.
//!
//! All ranks are 1-based and returned in input order.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Indices of `values` in ascending value order, ties kept in input order.
fn ascending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Competition ranking ("1224"): a run of ties takes the position of its first member.
pub fn rank(values: &[f64]) -> Vec<usize> {
    let order = ascending_order(values);
    let mut ranks = vec![0; values.len()];
    let mut current = 1;
    for (pos, &idx) in order.iter().enumerate() {
        if pos > 0 && values[idx] != values[order[pos - 1]] {
            current = pos + 1;
        }
        ranks[idx] = current;
    }
    ranks
}

/// Dense ranking ("1223"): the next distinct value always increments by one.
pub fn dense_rank(values: &[f64]) -> Vec<usize> {
    let order = ascending_order(values);
    let mut ranks = vec![0; values.len()];
    let mut current = 1;
    for (pos, &idx) in order.iter().enumerate() {
        if pos > 0 && values[idx] != values[order[pos - 1]] {
            current += 1;
        }
        ranks[idx] = current;
    }
    ranks
}

/// `(rank - 1) / (n - 1)` in `[0, 1]`. A single value ranks `0`; no values rank nothing.
pub fn percent_rank(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n <= 1 {
        return vec![0.0; n];
    }
    let denom = (n - 1) as f64;
    rank(values)
        .into_iter()
        .map(|r| (r - 1) as f64 / denom)
        .collect()
}

/// Assigns each value to one of `tiles` buckets by rank.
///
/// Buckets hold `ceil(len / tiles)` ranks each; the bucket number is capped at `tiles`.
/// Returns an empty vector when `tiles` is `0`.
pub fn ntile(values: &[f64], tiles: usize) -> Vec<usize> {
    if tiles == 0 || values.is_empty() {
        return Vec::new();
    }
    let per_tile = values.len().div_ceil(tiles);
    rank(values)
        .into_iter()
        .map(|r| r.div_ceil(per_tile).min(tiles))
        .collect()
}
