mod files_tests;
mod render_tests;

use crate::scan::{OperationRecord, OperationType, StartFields};
use chrono::{NaiveDate, NaiveDateTime};

fn at(minute: u32, millis: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 29)
        .unwrap()
        .and_hms_milli_opt(10, minute, 0, millis)
        .unwrap()
}

/// Closed record starting at minute `start_min`, lasting `dlc_ms`.
pub(super) fn record(id: &str, start_min: u32, dlc_ms: u32, ap_tx_ms: u64) -> OperationRecord {
    let start = StartFields {
        operation_type: OperationType::Load,
        operation_id: id,
        topic: "Trades",
        scope: "{AsOfDate=2026-01-29}",
        locked_stores: "Trades, Sensi",
    };
    let mut r = OperationRecord::open("main", start, at(start_min, 0));
    r.pivots.insert("VaR".to_string());
    r.pivots.insert("Sensi".to_string());
    r.ds_transaction_id = Some(format!("{id}1"));
    r.pivot_transaction_id = Some(format!("{id}1"));
    r.pivot_transaction_duration_ms = ap_tx_ms;
    r.pivot_commit_duration_ms = ap_tx_ms / 10;
    r.close(at(start_min, dlc_ms));
    r
}
