//! Conversion from the `prometheus` crate's protobuf families into
//! [`crate::models`], so a gathered registry can feed the aggregator.

use prometheus::proto::{self, MetricType};
use prometheus::Registry;

use crate::models::{family_map, FamilyMap, MetricFamily, MetricKind, Sample, SampleValue};

pub fn from_proto(family: &proto::MetricFamily) -> MetricFamily {
    let kind = match family.get_field_type() {
        MetricType::COUNTER => MetricKind::Counter,
        MetricType::GAUGE => MetricKind::Gauge,
        MetricType::HISTOGRAM => MetricKind::Histogram,
        MetricType::SUMMARY => MetricKind::Summary,
        MetricType::UNTYPED => MetricKind::Untyped,
    };

    let samples = family
        .get_metric()
        .iter()
        .map(|metric| Sample {
            labels: metric
                .get_label()
                .iter()
                .map(|pair| (pair.get_name().to_string(), pair.get_value().to_string()))
                .collect(),
            value: sample_value(kind, metric),
        })
        .collect();

    MetricFamily {
        name: family.get_name().to_string(),
        kind,
        samples,
    }
}

fn sample_value(kind: MetricKind, metric: &proto::Metric) -> SampleValue {
    match kind {
        MetricKind::Counter => SampleValue::Scalar(metric.get_counter().get_value()),
        MetricKind::Gauge => SampleValue::Scalar(metric.get_gauge().get_value()),
        MetricKind::Untyped => SampleValue::Scalar(metric.get_untyped().get_value()),
        MetricKind::Histogram => {
            let h = metric.get_histogram();
            SampleValue::Histogram {
                count: h.get_sample_count(),
                sum: h.get_sample_sum(),
            }
        }
        MetricKind::Summary => {
            let s = metric.get_summary();
            SampleValue::Histogram {
                count: s.get_sample_count(),
                sum: s.get_sample_sum(),
            }
        }
    }
}

/// Gathers every family currently registered in `registry`.
pub fn families_from_registry(registry: &Registry) -> FamilyMap {
    family_map(registry.gather().iter().map(from_proto))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts};

    #[test]
    fn test_gauge_and_counter_families() {
        let registry = Registry::new();
        let heap = Gauge::new("go_memstats_heap_alloc_bytes", "heap").unwrap();
        let rpcs = CounterVec::new(Opts::new("rpcs", "rpcs per client"), &["ip"]).unwrap();
        registry.register(Box::new(heap.clone())).unwrap();
        registry.register(Box::new(rpcs.clone())).unwrap();

        heap.set(2048.0);
        rpcs.with_label_values(&["10.0.0.1"]).inc_by(3.0);
        rpcs.with_label_values(&["10.0.0.2"]).inc();

        let families = families_from_registry(&registry);

        let heap_family = &families["go_memstats_heap_alloc_bytes"];
        assert_eq!(heap_family.kind, MetricKind::Gauge);
        assert_eq!(heap_family.first_sample().unwrap().scalar_value(), 2048.0);

        let rpcs_family = &families["rpcs"];
        assert_eq!(rpcs_family.kind, MetricKind::Counter);
        assert_eq!(rpcs_family.samples.len(), 2);
        let first = rpcs_family
            .samples
            .iter()
            .find(|s| s.label("ip") == Some("10.0.0.1"))
            .unwrap();
        assert_eq!(first.scalar_value(), 3.0);
    }

    #[test]
    fn test_histogram_family() {
        let registry = Registry::new();
        let handling = HistogramVec::new(
            HistogramOpts::new("grpc_server_handling_seconds", "handling time"),
            &["grpc_method"],
        )
        .unwrap();
        registry.register(Box::new(handling.clone())).unwrap();

        for _ in 0..4 {
            handling.with_label_values(&["Set"]).observe(0.5);
        }

        let families = families_from_registry(&registry);
        let family = &families["grpc_server_handling_seconds"];

        assert_eq!(family.kind, MetricKind::Histogram);
        let sample = family.first_sample().unwrap();
        assert_eq!(sample.label("grpc_method"), Some("Set"));
        assert_eq!(sample.histogram_value(), (4, 2.0));
    }

    #[test]
    fn test_empty_registry() {
        assert!(families_from_registry(&Registry::new()).is_empty());
    }
}
