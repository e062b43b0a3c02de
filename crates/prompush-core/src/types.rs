//! Remote-write wire types.
//!
//! The structs mirror the `prometheus.WriteRequest` protobuf schema. Field tags
//! must not change: receivers decode the body by tag, not by name.

use crate::error::{CoreError, Result};
use std::collections::HashSet;
use std::fmt;

/// Reserved label carrying the metric name.
pub const METRIC_NAME_LABEL: &str = "__name__";

/// A name/value pair identifying one dimension of a series.
#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct Label {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

impl Label {
    /// Create a new label
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One observed point. The timestamp is milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Sample {
    #[prost(double, tag = "1")]
    pub value: f64,
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
}

/// A representative observation attached to a series, usually pointing at a trace.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Exemplar {
    /// Exemplar labels are independent of the series labels.
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<Label>,
    #[prost(double, tag = "2")]
    pub value: f64,
    #[prost(int64, tag = "3")]
    pub timestamp: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TimeSeries {
    /// Exactly one `__name__` entry and no repeated names. Order is kept as built.
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<Label>,
    #[prost(message, repeated, tag = "2")]
    pub samples: Vec<Sample>,
    #[prost(message, repeated, tag = "3")]
    pub exemplars: Vec<Exemplar>,
}

impl TimeSeries {
    /// Value of the `__name__` label, if present.
    pub fn metric_name(&self) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == METRIC_NAME_LABEL)
            .map(|l| l.value.as_str())
    }
}

/// Top-level unit of transmission.
#[derive(Clone, PartialEq, prost::Message)]
pub struct WriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub timeseries: Vec<TimeSeries>,
}

impl WriteRequest {
    pub fn new(timeseries: Vec<TimeSeries>) -> Self {
        Self { timeseries }
    }
}

/// Checks a metric name before it is used for `__name__`.
pub fn validate_metric_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::EmptyMetricName);
    }
    Ok(())
}

/// Checks labels that will be appended after `__name__`.
///
/// Rejects empty names, the reserved metric name label, and any name that
/// appears twice. Receivers refuse series with repeated label names.
pub fn validate_extra_labels(labels: &[Label]) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if label.name.is_empty() {
            return Err(CoreError::EmptyLabelName);
        }
        if label.name == METRIC_NAME_LABEL {
            return Err(CoreError::ReservedLabelName(label.name.clone()));
        }
        if !seen.insert(label.name.as_str()) {
            return Err(CoreError::DuplicateLabelName(label.name.clone()));
        }
    }
    Ok(())
}

fn write_label_set<'a>(
    f: &mut fmt::Formatter<'_>,
    labels: impl Iterator<Item = &'a Label>,
) -> fmt::Result {
    f.write_str("{")?;
    for (i, label) in labels.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={:?}", label.name, label.value)?;
    }
    f.write_str("}")
}

/// Exposition-style rendering, e.g.
/// `prompush_series{job="prompush"} 0.42 @1700000000000 # {trace_id="1234"} 0.42 @1700000000000`
impl fmt::Display for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name().unwrap_or_default())?;
        write_label_set(
            f,
            self.labels.iter().filter(|l| l.name != METRIC_NAME_LABEL),
        )?;
        for sample in &self.samples {
            write!(f, " {} @{}", sample.value, sample.timestamp)?;
        }
        for exemplar in &self.exemplars {
            f.write_str(" # ")?;
            write_label_set(f, exemplar.labels.iter())?;
            write!(f, " {} @{}", exemplar.value, exemplar.timestamp)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> TimeSeries {
        TimeSeries {
            labels: vec![
                Label::new(METRIC_NAME_LABEL, "prompush_series"),
                Label::new("job", "prompush"),
            ],
            samples: vec![Sample {
                value: 0.5,
                timestamp: 1_700_000_000_000,
            }],
            exemplars: vec![Exemplar {
                labels: vec![Label::new("trace_id", "1234")],
                value: 0.5,
                timestamp: 1_700_000_000_000,
            }],
        }
    }

    #[test]
    fn test_metric_name() {
        assert_eq!(series().metric_name(), Some("prompush_series"));
        assert_eq!(TimeSeries::default().metric_name(), None);
    }

    #[test]
    fn test_validate_extra_labels() {
        let ok = vec![Label::new("job", "prompush"), Label::new("user", "alice")];
        assert!(validate_extra_labels(&ok).is_ok());
        assert!(validate_extra_labels(&[]).is_ok());

        let dup = vec![Label::new("job", "a"), Label::new("job", "b")];
        assert_eq!(
            validate_extra_labels(&dup),
            Err(CoreError::DuplicateLabelName("job".to_string()))
        );

        let reserved = vec![Label::new(METRIC_NAME_LABEL, "other")];
        assert_eq!(
            validate_extra_labels(&reserved),
            Err(CoreError::ReservedLabelName(METRIC_NAME_LABEL.to_string()))
        );

        let empty = vec![Label::new("", "x")];
        assert_eq!(validate_extra_labels(&empty), Err(CoreError::EmptyLabelName));
    }

    #[test]
    fn test_empty_label_value_is_allowed() {
        assert!(validate_extra_labels(&[Label::new("user", "")]).is_ok());
    }

    #[test]
    fn test_validate_metric_name() {
        assert!(validate_metric_name("prompush_series").is_ok());
        assert_eq!(validate_metric_name(""), Err(CoreError::EmptyMetricName));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            series().to_string(),
            "prompush_series{job=\"prompush\"} 0.5 @1700000000000 # {trace_id=\"1234\"} 0.5 @1700000000000"
        );
    }
}
