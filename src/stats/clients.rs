use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::{as_count, mandatory_family};
use crate::models::{FamilyMap, MetricFamily};
use crate::Result;

pub const RPCS_PER_CLIENT: &str = "immudb_number_of_rpcs_per_client";
pub const CLIENTS_LAST_MESSAGE_AT: &str = "immudb_clients_last_message_at_unix_seconds";

const CLIENT_LABEL: &str = "ip";

pub(super) struct ClientStats {
    pub nb_clients: usize,
    pub rpcs_per_client: BTreeMap<String, u64>,
    pub last_message_at_per_client: BTreeMap<String, u64>,
}

/// Per-client RPC counts and last-message timestamps. The two maps are read
/// from separate families and need not share keys.
pub(super) fn client_stats(families: &FamilyMap) -> Result<ClientStats> {
    let rpcs = mandatory_family(families, RPCS_PER_CLIENT)?;
    let last_message_at = mandatory_family(families, CLIENTS_LAST_MESSAGE_AT)?;

    let stats = ClientStats {
        nb_clients: rpcs.samples.len(),
        rpcs_per_client: values_by_client(rpcs),
        last_message_at_per_client: values_by_client(last_message_at),
    };
    debug!(clients = stats.nb_clients, "read client activity");

    Ok(stats)
}

/// Later samples overwrite earlier ones sharing the same client key.
fn values_by_client(family: &MetricFamily) -> BTreeMap<String, u64> {
    let mut values = BTreeMap::new();
    for sample in &family.samples {
        let client = sample.label_or_empty(CLIENT_LABEL);
        if client.is_empty() {
            warn!(family = %family.name, "sample without client ip label");
        }
        values.insert(client.to_string(), as_count(sample.scalar_value()));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{family_map, MetricKind, Sample};
    use crate::stats::tests::base_families;
    use pretty_assertions::assert_eq;

    fn families_with(rpcs: Vec<Sample>, last_seen: Vec<Sample>) -> FamilyMap {
        let mut families = family_map(base_families());
        families.insert(
            RPCS_PER_CLIENT.to_string(),
            MetricFamily::new(RPCS_PER_CLIENT, MetricKind::Counter, rpcs),
        );
        families.insert(
            CLIENTS_LAST_MESSAGE_AT.to_string(),
            MetricFamily::new(CLIENTS_LAST_MESSAGE_AT, MetricKind::Gauge, last_seen),
        );
        families
    }

    #[test]
    fn test_three_distinct_clients() {
        let families = families_with(
            vec![
                Sample::scalar(5.0).with_label("ip", "10.0.0.1"),
                Sample::scalar(7.0).with_label("ip", "10.0.0.2"),
                Sample::scalar(9.0).with_label("ip", "10.0.0.3"),
            ],
            vec![Sample::scalar(1_700_000_000.0).with_label("ip", "10.0.0.9")],
        );

        let stats = client_stats(&families).unwrap();

        assert_eq!(stats.nb_clients, 3);
        assert_eq!(
            stats.rpcs_per_client.keys().cloned().collect::<Vec<_>>(),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]
        );
        assert_eq!(stats.rpcs_per_client["10.0.0.2"], 7);
        // Independent key sets
        assert_eq!(stats.last_message_at_per_client.len(), 1);
        assert_eq!(stats.last_message_at_per_client["10.0.0.9"], 1_700_000_000);
    }

    #[test_log::test]
    fn test_duplicate_and_unlabeled_clients() {
        let families = families_with(
            vec![
                Sample::scalar(1.0).with_label("ip", "10.0.0.1"),
                Sample::scalar(2.0).with_label("ip", "10.0.0.1"),
                Sample::scalar(3.0),
                Sample::scalar(4.0).with_label("host", "x"),
            ],
            vec![],
        );

        let stats = client_stats(&families).unwrap();

        // Client count follows the sample count, not the distinct keys
        assert_eq!(stats.nb_clients, 4);
        assert_eq!(stats.rpcs_per_client.len(), 2);
        assert_eq!(stats.rpcs_per_client["10.0.0.1"], 2);
        assert_eq!(stats.rpcs_per_client[""], 4);
        assert!(stats.last_message_at_per_client.is_empty());
    }
}
