//! Summary statistics over duration samples
//!
//! Pure functions over sample slices. The aggregator guarantees every
//! emitted group carries at least one sample, so the empty-input branches
//! below exist for robustness, not as a contract.

/// Arithmetic sum.
pub fn sum(samples: &[f64]) -> f64 {
    samples.iter().sum()
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    sum(samples) / samples.len() as f64
}

/// Interpolated percentile, `p` in `[0, 100]`.
///
/// Linear interpolation between order statistics at rank `p/100 * (n-1)`,
/// so the result always lies within `[min, max]` of the samples and p95/p99
/// are reproducible across runs for the same sample multiset.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
