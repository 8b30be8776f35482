use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Families of one scrape, keyed by family name.
pub type FamilyMap = HashMap<String, MetricFamily>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Untyped,
}

/// Payload of a single sample. Summaries reuse the histogram shape since only
/// the (count, sum) pair is ever consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleValue {
    Scalar(f64),
    Histogram { count: u64, sum: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub value: SampleValue,
}

impl Sample {
    pub fn scalar(value: f64) -> Self {
        Self {
            labels: BTreeMap::new(),
            value: SampleValue::Scalar(value),
        }
    }

    pub fn histogram(count: u64, sum: f64) -> Self {
        Self {
            labels: BTreeMap::new(),
            value: SampleValue::Histogram { count, sum },
        }
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Label value, or the empty string when the sample does not carry it.
    pub fn label_or_empty(&self, key: &str) -> &str {
        self.label(key).unwrap_or("")
    }

    /// Scalar reading; 0 when the sample holds a histogram payload.
    pub fn scalar_value(&self) -> f64 {
        match self.value {
            SampleValue::Scalar(v) => v,
            SampleValue::Histogram { .. } => 0.0,
        }
    }

    /// (count, sum) pair; zeroes when the sample holds a scalar.
    pub fn histogram_value(&self) -> (u64, f64) {
        match self.value {
            SampleValue::Histogram { count, sum } => (count, sum),
            SampleValue::Scalar(_) => (0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFamily {
    pub name: String,
    pub kind: MetricKind,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: &str, kind: MetricKind, samples: Vec<Sample>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            samples,
        }
    }

    pub fn first_sample(&self) -> Option<&Sample> {
        self.samples.first()
    }
}

/// Builds a [`FamilyMap`] keyed by each family's own name. A repeated name
/// replaces the earlier family.
pub fn family_map<I>(families: I) -> FamilyMap
where
    I: IntoIterator<Item = MetricFamily>,
{
    families
        .into_iter()
        .map(|family| (family.name.clone(), family))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup() {
        let sample = Sample::scalar(3.0).with_label("ip", "10.0.0.1");

        assert_eq!(sample.label("ip"), Some("10.0.0.1"));
        assert_eq!(sample.label("database"), None);
        assert_eq!(sample.label_or_empty("database"), "");
    }

    #[test]
    fn test_payload_defaults() {
        let scalar = Sample::scalar(7.0);
        assert_eq!(scalar.scalar_value(), 7.0);
        assert_eq!(scalar.histogram_value(), (0, 0.0));

        let hist = Sample::histogram(4, 2.0);
        assert_eq!(hist.scalar_value(), 0.0);
        assert_eq!(hist.histogram_value(), (4, 2.0));
    }

    #[test]
    fn test_family_map_keys_by_name() {
        let map = family_map(vec![
            MetricFamily::new("a", MetricKind::Gauge, vec![Sample::scalar(1.0)]),
            MetricFamily::new("b", MetricKind::Counter, vec![]),
            MetricFamily::new("a", MetricKind::Gauge, vec![Sample::scalar(2.0)]),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map["a"].first_sample().map(Sample::scalar_value), Some(2.0));
        assert!(map["b"].first_sample().is_none());
    }

    #[test]
    fn test_deserialize_family_json() {
        let json = r#"{
            "name": "grpc_server_handling_seconds",
            "kind": "histogram",
            "samples": [
                {"labels": {"grpc_method": "Get"}, "value": {"histogram": {"count": 10, "sum": 5.0}}},
                {"value": {"scalar": 1.5}}
            ]
        }"#;

        let family: MetricFamily = serde_json::from_str(json).unwrap();
        assert_eq!(family.kind, MetricKind::Histogram);
        assert_eq!(family.samples[0].label("grpc_method"), Some("Get"));
        assert_eq!(family.samples[0].histogram_value(), (10, 5.0));
        assert!(family.samples[1].labels.is_empty());
        assert_eq!(family.samples[1].scalar_value(), 1.5);
    }
}
