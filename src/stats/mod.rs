//! Reduction of one metrics scrape into a [`Snapshot`] of node health.
//!
//! [`aggregate`] runs four independent passes over the same family map
//! (storage, clients, RPC durations, memory) and either returns a complete
//! snapshot or the first missing mandatory family. It never mutates its input
//! and keeps no state between calls.

mod clients;
mod db;
mod memory;
mod rpc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{FamilyMap, MetricFamily, Sample};
use crate::{Result, StatsError};

pub use clients::{CLIENTS_LAST_MESSAGE_AT, RPCS_PER_CLIENT};
pub use db::{LSM_SIZE_BYTES, NUMBER_OF_STORED_ENTRIES, UPTIME_HOURS, VLOG_SIZE_BYTES};
pub use memory::{
    HEAP_ALLOC_BYTES, HEAP_IDLE_BYTES, HEAP_INUSE_BYTES, STACK_INUSE_BYTES, SYS_BYTES,
};
pub use rpc::GRPC_SERVER_HANDLING_SECONDS;

/// Window used by [`Snapshot::clients_active_during_last_hour`].
pub const ACTIVE_CLIENT_WINDOW_SECS: i64 = 3600;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationAggregate {
    pub counter: u64,
    pub total_duration: f64,
    pub avg_duration: f64,
}

impl OperationAggregate {
    fn finalize(&mut self) {
        self.avg_duration = average(self.total_duration, self.counter);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RpcDuration {
    pub method: String,
    pub counter: u64,
    pub total_duration: f64,
    pub avg_duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientActivity {
    pub rpc_count: u64,
    pub last_seen_unix_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DbInfo {
    pub name: String,
    pub lsm_bytes: u64,
    pub vlog_bytes: u64,
    pub total_bytes: u64,
    pub entry_count: u64,
    pub uptime_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemStats {
    pub sys_bytes: u64,
    pub heap_alloc_bytes: u64,
    pub heap_idle_bytes: u64,
    pub heap_in_use_bytes: u64,
    pub stack_in_use_bytes: u64,
}

/// Aggregated view of one scrape. Client counts and last-message times are
/// kept as separate maps; [`Snapshot::client_activity`] joins them into one
/// [`ClientActivity`] per client id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub db: DbInfo,
    pub memstats: MemStats,
    pub reads: OperationAggregate,
    pub writes: OperationAggregate,
    pub durations_by_method: BTreeMap<String, RpcDuration>,
    pub nb_clients: usize,
    pub rpcs_per_client: BTreeMap<String, u64>,
    pub last_message_at_per_client: BTreeMap<String, u64>,
}

impl Snapshot {
    /// Clients whose last message is less than one hour older than `now`.
    pub fn clients_active_during_last_hour(
        &self,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, DateTime<Utc>> {
        self.clients_active_within(now, Duration::seconds(ACTIVE_CLIENT_WINDOW_SECS))
    }

    /// Clients whose last message is strictly younger than `window` at `now`.
    /// Timestamps ahead of `now` count as active.
    pub fn clients_active_within(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> BTreeMap<String, DateTime<Utc>> {
        self.last_message_at_per_client
            .iter()
            .filter_map(|(client, &secs)| {
                let secs = i64::try_from(secs).ok()?;
                let last_seen = Utc.timestamp_opt(secs, 0).single()?;
                (now.signed_duration_since(last_seen) < window)
                    .then(|| (client.clone(), last_seen))
            })
            .collect()
    }

    /// Per-client view over the union of both client families. A client known
    /// to only one of them reports zero for the other field.
    pub fn client_activity(&self) -> BTreeMap<String, ClientActivity> {
        let mut clients: BTreeMap<String, ClientActivity> = BTreeMap::new();
        for (client, &count) in &self.rpcs_per_client {
            clients.entry(client.clone()).or_default().rpc_count = count;
        }
        for (client, &secs) in &self.last_message_at_per_client {
            clients.entry(client.clone()).or_default().last_seen_unix_seconds = secs;
        }
        clients
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reduces one scrape into a [`Snapshot`].
///
/// Fails with [`StatsError::MissingMetric`] or [`StatsError::MissingSample`]
/// when a mandatory family is absent; no partial snapshot is produced.
pub fn aggregate(families: &FamilyMap) -> Result<Snapshot> {
    let db = db::db_info(families)?;
    let clients = clients::client_stats(families)?;
    let rpcs = rpc::rpc_stats(families)?;
    let memstats = memory::mem_stats(families);

    debug!(
        database = %db.name,
        clients = clients.nb_clients,
        methods = rpcs.durations_by_method.len(),
        "aggregated metrics snapshot"
    );

    Ok(Snapshot {
        db,
        memstats,
        reads: rpcs.reads,
        writes: rpcs.writes,
        durations_by_method: rpcs.durations_by_method,
        nb_clients: clients.nb_clients,
        rpcs_per_client: clients.rpcs_per_client,
        last_message_at_per_client: clients.last_message_at_per_client,
    })
}

fn average(total: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn mandatory_family<'a>(families: &'a FamilyMap, name: &str) -> Result<&'a MetricFamily> {
    families
        .get(name)
        .ok_or_else(|| StatsError::MissingMetric(name.to_string()))
}

fn first_sample<'a>(families: &'a FamilyMap, name: &str) -> Result<&'a Sample> {
    mandatory_family(families, name)?
        .first_sample()
        .ok_or_else(|| StatsError::MissingSample(name.to_string()))
}

/// Scalar readings are non-negative integers on the wire; negatives and NaN
/// clamp to zero.
fn as_count(value: f64) -> u64 {
    value as u64
}
