use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::{average, mandatory_family, OperationAggregate, RpcDuration};
use crate::catalog::{classify, OperationClass};
use crate::models::FamilyMap;
use crate::Result;

pub const GRPC_SERVER_HANDLING_SECONDS: &str = "grpc_server_handling_seconds";

const METHOD_LABEL: &str = "grpc_method";

pub(super) struct RpcStats {
    pub durations_by_method: BTreeMap<String, RpcDuration>,
    pub reads: OperationAggregate,
    pub writes: OperationAggregate,
}

/// Per-method handling time plus the read and write aggregates.
///
/// Reads and writes are accumulated on different units. Each read method adds
/// 1 to the read counter and its own average to the read total, so the read
/// average is a mean of per-method averages. Every write sample adds its call
/// count and summed time, so the write average is per call even when a method
/// is split across several samples.
pub(super) fn rpc_stats(families: &FamilyMap) -> Result<RpcStats> {
    let handling = mandatory_family(families, GRPC_SERVER_HANDLING_SECONDS)?;

    let mut durations_by_method = BTreeMap::new();
    let mut read_methods = BTreeSet::new();
    let mut writes = OperationAggregate::default();
    for sample in &handling.samples {
        let method = sample.label_or_empty(METHOD_LABEL);
        if method.is_empty() {
            warn!(family = %handling.name, "sample without grpc_method label");
        }
        let (counter, total_duration) = sample.histogram_value();

        match classify(method) {
            OperationClass::Read => {
                read_methods.insert(method.to_string());
            }
            OperationClass::Write => {
                writes.counter += counter;
                writes.total_duration += total_duration;
            }
            OperationClass::Unclassified => {}
        }

        durations_by_method.insert(
            method.to_string(),
            RpcDuration {
                method: method.to_string(),
                counter,
                total_duration,
                avg_duration: average(total_duration, counter),
            },
        );
    }

    let mut reads = OperationAggregate::default();
    for method in &read_methods {
        if let Some(duration) = durations_by_method.get(method) {
            reads.counter += 1;
            reads.total_duration += duration.avg_duration;
        }
    }
    reads.finalize();
    writes.finalize();

    debug!(
        methods = durations_by_method.len(),
        reads = reads.counter,
        writes = writes.counter,
        "read rpc durations"
    );

    Ok(RpcStats {
        durations_by_method,
        reads,
        writes,
    })
}
