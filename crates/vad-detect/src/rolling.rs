// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Trailing rolling mean and sample standard deviation per position.
///
/// `None` marks an undefined statistic: fewer than `min_periods` observations
/// for both, or fewer than two observations for the standard deviation
/// (ddof = 1 leaves a single-observation window without a defined std even
/// when `min_periods == 1`).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RollingStats {
    pub mean: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
}

/// Computes causal (non-centered) rolling statistics: the window at position
/// `i` covers the most recent `window` samples ending at `i` inclusive. No
/// future sample ever contributes to the statistics at `i`.
///
/// Each window is evaluated with a two-pass mean/variance so results are
/// deterministic and independent of any incremental-update ordering.
pub(crate) fn rolling_mean_std(values: &[f64], window: usize, min_periods: usize) -> RollingStats {
    debug_assert!(window >= 1);
    debug_assert!((1..=window).contains(&min_periods));

    let n = values.len();
    let mut mean = vec![None; n];
    let mut std = vec![None; n];

    for i in 0..n {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        let count = slice.len();
        if count < min_periods {
            continue;
        }

        let m = slice.iter().sum::<f64>() / count as f64;
        mean[i] = Some(m);

        if count >= 2 {
            let sum_sq = slice.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
            std[i] = Some((sum_sq / (count - 1) as f64).sqrt());
        }
    }

    RollingStats { mean, std }
}
