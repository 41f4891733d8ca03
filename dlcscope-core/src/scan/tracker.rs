use crate::scan::classify::{Event, StartFields};
use crate::scan::record::OperationRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Internal handle of an open operation. Bridges and thread slots hold keys,
/// never the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey(u64);

/// What happens when a start line arrives on a thread that already has an
/// open operation. The previous operation is never closed and yields no
/// record; the variants only differ in how loudly that is reported.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReopenPolicy {
    #[default]
    DiscardSilently,
    DiscardWithWarning,
}

/// An operation removed from the tracker by its finish line.
#[derive(Debug)]
pub struct ClosedOperation {
    pub record: OperationRecord,
    /// Raw lines captured while open, when capture is enabled.
    pub lines: Option<Vec<String>>,
}

/// Per-thread operation slots plus the datastore and pivot bridges.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationTracker {
    next_key: u64,
    open: HashMap<OperationKey, OperationRecord>,
    threads: HashMap<String, OperationKey>,
    ds_bridge: HashMap<String, OperationKey>,
    pivot_bridge: HashMap<String, OperationKey>,
    last_opened: Option<OperationKey>,
    reopen_policy: ReopenPolicy,
    capture_lines: bool,
}

impl OperationTracker {
    pub fn new(reopen_policy: ReopenPolicy, capture_lines: bool) -> Self {
        Self {
            next_key: 0,
            open: HashMap::new(),
            threads: HashMap::new(),
            ds_bridge: HashMap::new(),
            pivot_bridge: HashMap::new(),
            last_opened: None,
            reopen_policy,
            capture_lines,
        }
    }

    //-------------------------------------------------------------------------
    // Lifecycle
    //-------------------------------------------------------------------------

    /// Opens an operation on `thread`, replacing whatever was open there.
    pub fn open(
        &mut self,
        thread: &str,
        start: StartFields<'_>,
        start_time: NaiveDateTime,
        raw_line: &str,
    ) -> OperationKey {
        let key = OperationKey(self.next_key);
        self.next_key += 1;

        let mut record = OperationRecord::open(thread, start, start_time);
        if self.capture_lines {
            record.buffered_lines = Some(vec![raw_line.to_string()]);
        }

        if let Some(previous) = self.threads.insert(thread.to_string(), key) {
            self.discard(previous);
        }

        self.open.insert(key, record);
        self.last_opened = Some(key);
        key
    }

    /// Appends a raw line to the buffer of the operation open on `thread`.
    pub fn buffer_line(&mut self, thread: &str, raw_line: &str) {
        if !self.capture_lines {
            return;
        }
        let Some(record) = self.open_on_thread_mut(thread) else {
            return;
        };
        if let Some(lines) = record.buffered_lines.as_mut() {
            lines.push(raw_line.to_string());
        }
    }

    /// Applies a correlated (non-start) event. Returns the closed operation
    /// when the event is a finish line for an open operation.
    pub fn apply(
        &mut self,
        thread: &str,
        timestamp: Option<NaiveDateTime>,
        event: &Event<'_>,
    ) -> Option<ClosedOperation> {
        match *event {
            Event::DatastoreCommit {
                ds_tx_id,
                transaction_ms,
                commit_ms,
            } => {
                let record = self.resolve_mut(self.ds_bridge.get(ds_tx_id).copied())?;
                record.ds_transaction_id = Some(ds_tx_id.to_string());
                record.ds_transaction_duration_ms =
                    record.ds_transaction_duration_ms.saturating_add(transaction_ms);
                record.ds_commit_duration_ms =
                    record.ds_commit_duration_ms.saturating_add(commit_ms);
                None
            }

            Event::DatastoreStart { ds_tx_id } => {
                // The datastore event is usually emitted by another thread than
                // the DLC one, so fall back to the most recently opened
                // operation. This can misattribute under overlapping loads.
                let key = self
                    .threads
                    .get(thread)
                    .copied()
                    .or(self.last_opened)
                    .filter(|k| self.open.contains_key(k))?;

                if let Some(record) = self.open.get_mut(&key) {
                    record.pivot_transaction_id = Some(ds_tx_id.to_string());
                }
                self.ds_bridge.insert(ds_tx_id.to_string(), key);
                None
            }

            Event::PivotLink { ap_tx_id, ds_tx_id } => {
                let key = self.ds_bridge.get(ds_tx_id).copied()?;
                self.pivot_bridge.insert(ap_tx_id.to_string(), key);
                None
            }

            Event::PivotCommit {
                ap_tx_id,
                pivot,
                transaction_ms,
                commit_ms,
            } => {
                let record = self.resolve_mut(self.pivot_bridge.get(ap_tx_id).copied())?;
                record.pivots.insert(pivot.to_string());
                record.pivot_transaction_duration_ms =
                    record.pivot_transaction_duration_ms.saturating_add(transaction_ms);
                record.pivot_commit_duration_ms =
                    record.pivot_commit_duration_ms.saturating_add(commit_ms);
                None
            }

            Event::Finish { operation_id } => {
                let Some(end_time) = timestamp else {
                    tracing::debug!(thread, operation_id, "finish line without timestamp ignored");
                    return None;
                };
                self.close(thread, end_time)
            }

            // Start lines go through `open`.
            Event::Start(_) => None,
        }
    }

    fn close(&mut self, thread: &str, end_time: NaiveDateTime) -> Option<ClosedOperation> {
        let key = self.threads.remove(thread)?;
        let mut record = self.open.remove(&key)?;

        self.ds_bridge.retain(|_, k| *k != key);
        if self.last_opened == Some(key) {
            self.last_opened = None;
        }

        let lines = record.close(end_time);
        Some(ClosedOperation { record, lines })
    }

    fn discard(&mut self, key: OperationKey) {
        let Some(record) = self.open.remove(&key) else {
            return;
        };
        self.ds_bridge.retain(|_, k| *k != key);

        match self.reopen_policy {
            ReopenPolicy::DiscardSilently => {}
            ReopenPolicy::DiscardWithWarning => tracing::warn!(
                thread = %record.thread,
                operation_id = %record.operation_id,
                start_time = %record.start_time,
                "operation replaced before its finish line; discarding"
            ),
        }
    }

    //-------------------------------------------------------------------------
    // Lookups
    //-------------------------------------------------------------------------

    fn resolve_mut(&mut self, key: Option<OperationKey>) -> Option<&mut OperationRecord> {
        self.open.get_mut(&key?)
    }

    fn open_on_thread_mut(&mut self, thread: &str) -> Option<&mut OperationRecord> {
        let key = self.threads.get(thread).copied()?;
        self.open.get_mut(&key)
    }

    pub fn open_on_thread(&self, thread: &str) -> Option<&OperationRecord> {
        self.open.get(self.threads.get(thread)?)
    }

    pub fn has_open(&self, thread: &str) -> bool {
        self.threads.contains_key(thread)
    }

    /// The operation a datastore transaction id currently resolves to.
    pub fn resolve_ds_transaction(&self, ds_tx_id: &str) -> Option<&OperationRecord> {
        self.open.get(self.ds_bridge.get(ds_tx_id)?)
    }

    /// The operation a pivot transaction id currently resolves to.
    pub fn resolve_pivot_transaction(&self, ap_tx_id: &str) -> Option<&OperationRecord> {
        self.open.get(self.pivot_bridge.get(ap_tx_id)?)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn reopen_policy(&self) -> ReopenPolicy {
        self.reopen_policy
    }
}
