use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ops::Range;

/// Illustrative outcome figures shown next to a case study
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaseStudyMetrics {
    pub accuracy_pct: f64,
    pub hours_saved_weekly: u32,
    pub claims_processed: u32,
}

/// Deterministic generator for display-only figures.
///
/// The same seed always yields the same sequence, so a page keyed by slug
/// shows stable numbers across renders.
#[derive(Debug, Clone)]
pub struct MetricGenerator {
    rng: StdRng,
}

impl MetricGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from a string key via FNV-1a, stable across runs and platforms
    pub fn for_key(key: &str) -> Self {
        Self::new(fnv1a(key))
    }

    pub fn value_in(&mut self, range: Range<u32>) -> u32 {
        if range.is_empty() {
            return range.start;
        }
        self.rng.gen_range(range)
    }

    /// Percentage in `[min, max)` rounded to one decimal
    pub fn percentage(&mut self, min: f64, max: f64) -> f64 {
        if !(min < max) {
            return min;
        }
        let raw: f64 = self.rng.gen_range(min..max);
        (raw * 10.0).round() / 10.0
    }

    pub fn case_study(slug: &str) -> CaseStudyMetrics {
        let mut gen = Self::for_key(slug);
        CaseStudyMetrics {
            accuracy_pct: gen.percentage(92.0, 99.5),
            hours_saved_weekly: gen.value_in(4..21),
            claims_processed: gen.value_in(1_200..48_000),
        }
    }
}

fn fnv1a(key: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    key.bytes()
        .fold(OFFSET, |hash, b| (hash ^ b as u64).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = MetricGenerator::new(42);
        let mut b = MetricGenerator::new(42);
        for _ in 0..20 {
            assert_eq!(a.value_in(0..1000), b.value_in(0..1000));
        }
    }

    #[test]
    fn keyed_metrics_are_stable() {
        assert_eq!(
            MetricGenerator::case_study("rural-clinic-coding"),
            MetricGenerator::case_study("rural-clinic-coding")
        );
    }

    #[test]
    fn case_study_metrics_stay_in_range() {
        for slug in ["a", "b", "rural-clinic-coding", "cardiology-documentation"] {
            let m = MetricGenerator::case_study(slug);
            assert!((92.0..=99.5).contains(&m.accuracy_pct), "{m:?}");
            assert!((4..21).contains(&m.hours_saved_weekly));
            assert!((1_200..48_000).contains(&m.claims_processed));
        }
    }

    #[test]
    fn percentage_has_one_decimal() {
        let mut g = MetricGenerator::new(7);
        for _ in 0..50 {
            let p = g.percentage(10.0, 20.0);
            assert!(((p * 10.0).round() - p * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_ranges_return_the_lower_bound() {
        let mut g = MetricGenerator::new(1);
        assert_eq!(g.value_in(5..5), 5);
        assert_eq!(g.percentage(3.0, 3.0), 3.0);
    }

    #[test]
    fn fnv_matches_reference_values() {
        assert_eq!(fnv1a(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    }
}
