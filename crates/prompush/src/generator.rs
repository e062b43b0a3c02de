//! Synthetic sample generation.

use chrono::{DateTime, Utc};
use prompush_core::{to_epoch_millis, Exemplar, Label, Sample, TimeSeries, METRIC_NAME_LABEL};
use rand::prelude::*;
use std::collections::BTreeMap;

/// Source of sample values in `[0, 1)`.
pub trait ValueSource {
    fn next_value(&mut self) -> f64;
}

/// Uniformly distributed values from a seedable RNG.
pub struct UniformValues {
    rng: rand::rngs::StdRng,
}

impl UniformValues {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: rand::rngs::StdRng::from_entropy(),
        }
    }
}

impl ValueSource for UniformValues {
    fn next_value(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always yields the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantValue(pub f64);

impl ValueSource for ConstantValue {
    fn next_value(&mut self) -> f64 {
        self.0
    }
}

/// Builds one series per call: a single sample and an exemplar mirroring it.
pub struct SampleGenerator<V = UniformValues> {
    values: V,
    exemplar_label: Label,
}

impl<V: ValueSource> SampleGenerator<V> {
    pub fn new(values: V, exemplar_label: Label) -> Self {
        Self {
            values,
            exemplar_label,
        }
    }

    /// Generates the series for `metric_name` at `timestamp`.
    ///
    /// Labels are `__name__` followed by `extra_labels` in the given order.
    /// `extra_labels` must already be validated: no `__name__`, no repeated names.
    pub fn generate(
        &mut self,
        metric_name: &str,
        timestamp: DateTime<Utc>,
        extra_labels: &[Label],
    ) -> TimeSeries {
        let timestamp = to_epoch_millis(timestamp);
        let value = self.values.next_value();

        let mut labels = Vec::with_capacity(extra_labels.len() + 1);
        labels.push(Label::new(METRIC_NAME_LABEL, metric_name));
        labels.extend_from_slice(extra_labels);

        TimeSeries {
            labels,
            samples: vec![Sample { value, timestamp }],
            exemplars: vec![Exemplar {
                labels: vec![self.exemplar_label.clone()],
                value,
                timestamp,
            }],
        }
    }
}

/// The instant-vector sample a query for a pushed series should return.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedSample {
    pub metric: BTreeMap<String, String>,
    pub value: f64,
    pub timestamp_ms: i64,
}

/// Derives the expected query result from the first sample of `series`.
pub fn expected_sample(series: &TimeSeries) -> Option<ExpectedSample> {
    let sample = series.samples.first()?;
    let metric = series
        .labels
        .iter()
        .map(|l| (l.name.clone(), l.value.clone()))
        .collect();
    Some(ExpectedSample {
        metric,
        value: sample.value,
        timestamp_ms: sample.timestamp,
    })
}
