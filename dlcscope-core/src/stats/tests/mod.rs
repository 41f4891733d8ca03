
use crate::scan::{OperationRecord, OperationType, StartFields};
use chrono::{NaiveDate, NaiveDateTime};

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// A closed record lasting `secs` seconds with the given pivot timings.
pub(super) fn record(id: &str, secs: u32, ap_tx_ms: u64, ap_commit_ms: u64) -> OperationRecord {
    let start = StartFields {
        operation_type: OperationType::Load,
        operation_id: id,
        topic: "T",
        scope: "",
        locked_stores: "A",
    };
    let mut r = OperationRecord::open("main", start, at(0, 0, 0));
    r.pivot_transaction_id = Some(format!("{id}00"));
    r.pivot_transaction_duration_ms = ap_tx_ms;
    r.pivot_commit_duration_ms = ap_commit_ms;
    r.close(at(0, secs / 60, secs % 60));
    r
}
