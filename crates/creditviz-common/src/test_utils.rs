//! Test utilities and shared fixtures for the creditviz workspace.
//!
//! Enabled for the crate's own tests and for downstream crates through the
//! `testing` feature.

use crate::Record;

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "testing")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Sample registry records.
pub mod record_fixtures {
    use super::*;

    /// The three-record example: Africa 300/50, Asia 300/100.
    pub fn worked_example() -> Vec<Record> {
        vec![
            Record::new("Africa", "Kenya", Some(100.0), Some(50.0)),
            Record::new("Africa", "Uganda", Some(200.0), Some(0.0)),
            Record::new("Asia", "India", Some(300.0), Some(100.0)),
        ]
    }

    /// A larger set with missing values, repeated countries and ties.
    pub fn registry_sample() -> Vec<Record> {
        vec![
            Record::new("Africa", "Kenya", Some(1_200.0), Some(300.0)),
            Record::new("Africa", "Uganda", Some(800.0), Some(400.0)),
            Record::new("Africa", "Kenya", Some(500.0), None),
            Record::new("Africa", "Ghana", None, Some(900.0)),
            Record::new("Africa", "Zambia", Some(800.0), Some(10.0)),
            Record::new("Asia", "India", Some(5_000.0), Some(2_000.0)),
            Record::new("Asia", "China", Some(7_500.0), Some(1_000.0)),
            Record::new("Asia", "Indonesia", Some(300.0), Some(250.0)),
            Record::new("Asia", "Viet Nam", Some(300.0), Some(50.0)),
            Record::new("Europe", "Turkey", None, None),
            Record::new("North America", "United States", Some(9_000.0), Some(6_000.0)),
            Record::new("North America", "Canada", Some(1_000.0), Some(900.0)),
        ]
    }
}

/// Property-based testing strategies.
#[cfg(feature = "testing")]
pub mod property_testing {
    use crate::Record;
    use proptest::prelude::*;

    /// Region names drawn from a small pool so groups collide.
    pub fn region_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Africa", "Asia", "Europe", "Oceania"]).prop_map(str::to_string)
    }

    /// Country names drawn from a small pool so per-country sums accumulate.
    pub fn country_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Kenya", "India", "Brazil", "Peru", "Chile", "Fiji"])
            .prop_map(str::to_string)
    }

    /// Integral credit quantities, absent about a fifth of the time.
    pub fn quantity_strategy() -> impl Strategy<Value = Option<f64>> {
        prop::option::weighted(0.8, (0u32..1_000_000).prop_map(f64::from))
    }

    pub fn record_strategy() -> impl Strategy<Value = Record> {
        (
            region_strategy(),
            country_strategy(),
            quantity_strategy(),
            quantity_strategy(),
        )
            .prop_map(|(region, country, issued, remaining)| Record {
                region,
                country,
                issued,
                remaining,
            })
    }

    pub fn records_strategy(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(record_strategy(), 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0001, 0.001);
        assert_approx_eq(1.0, 0.9999, 0.001);
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.05);
    }

    #[test]
    fn test_worked_example_shape() {
        let records = record_fixtures::worked_example();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(Record::is_complete));
    }
}
