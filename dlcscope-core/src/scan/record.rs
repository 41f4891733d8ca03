use crate::scan::classify::StartFields;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Kind of DLC operation announced on the start line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Load,
    Unload,
}

impl OperationType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOAD" => Some(Self::Load),
            "UNLOAD" => Some(Self::Unload),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "LOAD",
            Self::Unload => "UNLOAD",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One load/unload operation, correlated across the DLC thread and the
/// datastore / pivot transaction managers.
///
/// While the operation is open the record is mutated in place by every
/// correlated event. Closing it fills `end_time` and `dlc_duration_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    pub thread: String,
    pub operation_id: String,
    pub operation_type: OperationType,
    pub topic: String,
    pub scope: String,
    /// Raw comma-joined store list, as printed.
    pub locked_stores: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub pivots: BTreeSet<String>,

    pub ds_transaction_id: Option<String>,
    pub ds_transaction_duration_ms: u64,
    pub ds_commit_duration_ms: u64,

    /// Datastore transaction id that fired the pivot transactions of this
    /// operation. This is the key the pivot bridge is built from.
    pub pivot_transaction_id: Option<String>,
    pub pivot_transaction_duration_ms: u64,
    pub pivot_commit_duration_ms: u64,

    pub dlc_duration_ms: i64,

    /// Raw lines captured while the operation is open. Drained on close.
    pub buffered_lines: Option<Vec<String>>,
}

impl OperationRecord {
    pub(crate) fn open(
        thread: &str,
        start: StartFields<'_>,
        start_time: NaiveDateTime,
    ) -> Self {
        Self {
            thread: thread.to_string(),
            operation_id: start.operation_id.to_string(),
            operation_type: start.operation_type,
            topic: start.topic.to_string(),
            scope: start.scope.to_string(),
            locked_stores: start.locked_stores.to_string(),
            start_time,
            end_time: None,
            pivots: BTreeSet::new(),
            ds_transaction_id: None,
            ds_transaction_duration_ms: 0,
            ds_commit_duration_ms: 0,
            pivot_transaction_id: None,
            pivot_transaction_duration_ms: 0,
            pivot_commit_duration_ms: 0,
            dlc_duration_ms: 0,
            buffered_lines: None,
        }
    }

    /// Closes the record at `end_time` and returns the captured lines, if any.
    pub(crate) fn close(&mut self, end_time: NaiveDateTime) -> Option<Vec<String>> {
        self.end_time = Some(end_time);
        self.dlc_duration_ms = (end_time - self.start_time).num_milliseconds();
        self.buffered_lines.take()
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Pivot names joined for flat outputs.
    pub fn pivots_joined(&self) -> String {
        self.pivots.iter().map(String::as_str).collect::<Vec<_>>().join(";")
    }
}
