use tracing::debug;

use super::{as_count, first_sample, DbInfo};
use crate::models::FamilyMap;
use crate::Result;

pub const LSM_SIZE_BYTES: &str = "immudb_lsm_size_bytes";
pub const VLOG_SIZE_BYTES: &str = "immudb_vlog_size_bytes";
pub const NUMBER_OF_STORED_ENTRIES: &str = "immudb_number_of_stored_entries";
pub const UPTIME_HOURS: &str = "immudb_uptime_hours";

/// Storage footprint, entry count and uptime. All four families are mandatory.
pub(super) fn db_info(families: &FamilyMap) -> Result<DbInfo> {
    let lsm = first_sample(families, LSM_SIZE_BYTES)?;
    let lsm_bytes = as_count(lsm.scalar_value());
    let vlog_bytes = as_count(first_sample(families, VLOG_SIZE_BYTES)?.scalar_value());
    let entry_count = as_count(first_sample(families, NUMBER_OF_STORED_ENTRIES)?.scalar_value());
    let uptime_hours = first_sample(families, UPTIME_HOURS)?.scalar_value();

    let info = DbInfo {
        name: lsm.label_or_empty("database").to_string(),
        lsm_bytes,
        vlog_bytes,
        total_bytes: lsm_bytes.saturating_add(vlog_bytes),
        entry_count,
        uptime_hours,
    };
    debug!(database = %info.name, total_bytes = info.total_bytes, "read storage info");

    Ok(info)
}
