use tracing::debug;

use super::{as_count, MemStats};
use crate::models::FamilyMap;

pub const SYS_BYTES: &str = "go_memstats_sys_bytes";
pub const HEAP_ALLOC_BYTES: &str = "go_memstats_heap_alloc_bytes";
pub const HEAP_IDLE_BYTES: &str = "go_memstats_heap_idle_bytes";
pub const HEAP_INUSE_BYTES: &str = "go_memstats_heap_inuse_bytes";
pub const STACK_INUSE_BYTES: &str = "go_memstats_stack_inuse_bytes";

/// Process memory usage. Every family is optional and reads as zero when
/// absent or empty.
pub(super) fn mem_stats(families: &FamilyMap) -> MemStats {
    MemStats {
        sys_bytes: optional_gauge(families, SYS_BYTES),
        heap_alloc_bytes: optional_gauge(families, HEAP_ALLOC_BYTES),
        heap_idle_bytes: optional_gauge(families, HEAP_IDLE_BYTES),
        heap_in_use_bytes: optional_gauge(families, HEAP_INUSE_BYTES),
        stack_in_use_bytes: optional_gauge(families, STACK_INUSE_BYTES),
    }
}

fn optional_gauge(families: &FamilyMap, name: &str) -> u64 {
    match families.get(name).and_then(|family| family.first_sample()) {
        Some(sample) => as_count(sample.scalar_value()),
        None => {
            debug!(family = name, "optional memory metric not present");
            0
        }
    }
}
