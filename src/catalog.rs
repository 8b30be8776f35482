use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;

/// Kind of work an RPC method performs against the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationClass {
    Read,
    Write,
    Unclassified,
}

lazy_static! {
    static ref READ_METHODS: HashSet<&'static str> = [
        "ByIndex",
        "ByIndexSV",
        "Consistency",
        "Count",
        "CurrentRoot",
        "Dump",
        "Get",
        "GetBatch",
        "GetBatchSV",
        "GetSV",
        "Health",
        "History",
        "HistorySV",
        "IScan",
        "IScanSV",
        "Inclusion",
        "Login",
        "SafeGet",
        "SafeGetSV",
        "Scan",
        "ScanSV",
        "ZScan",
        "ZScanSV",
    ]
    .into_iter()
    .collect();

    static ref WRITE_METHODS: HashSet<&'static str> = [
        "Reference",
        "SafeReference",
        "SafeSet",
        "SafeSetSV",
        "SafeZAdd",
        "Set",
        "SetBatch",
        "SetBatchSV",
        "SetSV",
        "ZAdd",
    ]
    .into_iter()
    .collect();
}

/// Classifies a gRPC method name. Matching is exact and case-sensitive.
pub fn classify(method: &str) -> OperationClass {
    if READ_METHODS.contains(method) {
        OperationClass::Read
    } else if WRITE_METHODS.contains(method) {
        OperationClass::Write
    } else {
        OperationClass::Unclassified
    }
}
