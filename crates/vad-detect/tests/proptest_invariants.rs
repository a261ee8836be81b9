// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use vad_core::{CleanedTable, TimeAxis, TimePoint};
use vad_detect::{detect, DetectConfig, SpikeReason};

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn indexed(voltage: Vec<f64>) -> CleanedTable {
    let n = voltage.len();
    CleanedTable::new(TimeAxis::SampleIndex { n }, voltage)
        .expect("generated voltage is finite")
}

/// Voltage series with occasional large excursions so both criteria get a
/// chance to fire.
fn voltage_series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            8 => 10.0f64..15.0,
            1 => 50.0f64..200.0,
        ],
        0..128,
    )
}

fn detect_config() -> impl Strategy<Value = DetectConfig> {
    (1usize..=16, 0.5f64..4.0, 1.0f64..50.0).prop_flat_map(|(window, z, d)| {
        (1usize..=window).prop_map(move |min_periods| DetectConfig {
            window,
            min_periods,
            zscore_threshold: z,
            delta_threshold: d,
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        failure_persistence: Some(Box::new(FileFailurePersistence::Off)),
        .. ProptestConfig::default()
    })]

    #[test]
    fn detection_is_deterministic(
        voltage in voltage_series(),
        config in detect_config()
    ) {
        let table = indexed(voltage);
        let first = detect(&table, &config).expect("first run should succeed");
        let second = detect(&table, &config).expect("second run should succeed");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_flagged_row_strictly_exceeds_a_threshold(
        voltage in voltage_series(),
        config in detect_config()
    ) {
        let table = indexed(voltage);
        let (spikes, _) = detect(&table, &config).expect("detect should succeed");
        for row in spikes.rows() {
            let zscore_fired = row.zscore.is_some_and(|z| z.abs() > config.zscore_threshold);
            let delta_fired = row.delta.is_some_and(|d| d > config.delta_threshold);
            let expected = match row.reason {
                SpikeReason::Zscore => zscore_fired && !delta_fired,
                SpikeReason::Delta => delta_fired && !zscore_fired,
                SpikeReason::ZscoreDelta => zscore_fired && delta_fired,
            };
            prop_assert!(expected, "reason {} does not match evidence: {row:?}", row.reason);
        }
    }

    #[test]
    fn report_counts_are_consistent(
        voltage in voltage_series(),
        config in detect_config()
    ) {
        let table = indexed(voltage);
        let (spikes, report) = detect(&table, &config).expect("detect should succeed");
        prop_assert_eq!(report.total_samples, table.n());
        prop_assert_eq!(report.combined_spikes, spikes.len());
        prop_assert!(report.combined_spikes <= report.zscore_spikes + report.delta_spikes);
        prop_assert!(report.zscore_spikes <= report.combined_spikes);
        prop_assert!(report.delta_spikes <= report.combined_spikes);
    }

    #[test]
    fn series_shorter_than_min_periods_never_zscore_flags(
        voltage in prop::collection::vec(10.0f64..200.0, 0..8),
        config in detect_config()
    ) {
        prop_assume!(voltage.len() < config.min_periods);
        let table = indexed(voltage);
        let (spikes, report) = detect(&table, &config).expect("detect should succeed");
        prop_assert_eq!(report.zscore_spikes, 0);
        for row in spikes.rows() {
            prop_assert_eq!(row.zscore, None);
        }
    }

    #[test]
    fn spike_rows_follow_table_order_and_values(
        voltage in voltage_series(),
        config in detect_config()
    ) {
        let table = indexed(voltage);
        let (spikes, _) = detect(&table, &config).expect("detect should succeed");
        let mut previous: Option<usize> = None;
        for row in spikes.rows() {
            let TimePoint::SampleIndex(i) = row.time else {
                prop_assert!(false, "synthetic axis must yield sample indices");
                return Ok(());
            };
            prop_assert!(previous.map_or(true, |p| p < i), "rows out of order at {i}");
            prop_assert_eq!(row.voltage, table.voltage()[i]);
            previous = Some(i);
        }
    }
}
