// ============================================================
// Layer 3 — Descriptive Statistics
// ============================================================
// Count / mean / std / min / quartiles / max over a list of
// numbers. Used for the text-length and duplication-count
// diagnostics; nothing downstream depends on these values.
//
// Quartiles use linear interpolation between the two nearest
// ranks, and std is the sample (n - 1) standard deviation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean:  f64,
    pub std:   f64,
    pub min:   f64,
    pub p25:   f64,
    pub p50:   f64,
    pub p75:   f64,
    pub max:   f64,
}

impl Summary {
    /// Describe a set of values. An empty input yields an all-zero summary.
    pub fn describe<I>(values: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut sorted: Vec<f64> = values.into_iter().map(|v| v as f64).collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean  = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.50),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos   = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac  = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} mean={:.2} std={:.2} min={} 25%={:.2} 50%={:.2} 75%={:.2} max={}",
            self.count, self.mean, self.std, self.min, self.p25, self.p50, self.p75, self.max,
        )
    }
}

/// Number of rows per class value, ordered by class.
pub fn value_counts<I>(values: I) -> BTreeMap<u64, usize>
where
    I: IntoIterator<Item = u64>,
{
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Share of rows that belong to the most common class.
pub fn largest_class_share(counts: &BTreeMap<u64, usize>) -> f64 {
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let largest = counts.values().copied().max().unwrap_or(0);
    largest as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_matches_known_values() {
        let s = Summary::describe([1, 2, 3, 4]);
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        // sample std of 1..=4
        assert!((s.std - 1.290_994_448_735_805_6).abs() < 1e-9);
        assert_eq!(s.min, 1.0);
        assert!((s.p25 - 1.75).abs() < 1e-12);
        assert!((s.p50 - 2.5).abs() < 1e-12);
        assert!((s.p75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn test_describe_single_and_empty() {
        let one = Summary::describe([7]);
        assert_eq!(one.std, 0.0);
        assert_eq!(one.p50, 7.0);

        let none = Summary::describe(Vec::<usize>::new());
        assert_eq!(none, Summary::default());
    }

    #[test]
    fn test_value_counts_and_largest_class() {
        let counts = value_counts([100, 200, 100, 100]);
        assert_eq!(counts[&100], 3);
        assert_eq!(counts[&200], 1);
        assert!((largest_class_share(&counts) - 0.75).abs() < 1e-12);
        assert_eq!(largest_class_share(&BTreeMap::new()), 0.0);
    }
}
