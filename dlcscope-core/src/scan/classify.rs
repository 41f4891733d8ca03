use crate::scan::record::OperationType;
use regex::{Captures, Regex};

const START: &str = concat!(
    r"Starting (?P<type>LOAD|UNLOAD) operation, operation_id=(?P<op_id>\d+), ",
    r"on topic \[(?P<topic>.*?)\], ",
    r"with scope \{(?P<scope>.*?)\}\.\s+Locking stores: \[(?P<locked_stores>.*?)\]",
);

const DS_COMMIT: &str = concat!(
    r"event_type=DatastoreTransactionCommitted Transaction Committed  ",
    r"transaction_id=(?P<ds_tx_id>\d+) transaction_duration=(?P<tx_dur>\d+)ms ",
    r"commit_duration=(?P<commit_dur>\d+)ms",
);

const DS_START: &str =
    r"event_type=DatastoreTransactionStarted Transaction Started\s+transaction_id=(?P<ds_tx_id>\d+)";

const PIVOT_LINK: &str = concat!(
    r"ActivePivot transaction (?P<ap_tx_id>\d+) started, ",
    r"fired by database transaction (?P<ds_tx_id>\d+)",
);

const PIVOT_COMMIT: &str = concat!(
    r"event_type=ActivePivotTransactionCommittedEvent.*?Pivots = \[(?P<pivot>.*?)\].*?",
    r"ActivePivot transaction (?P<ap_tx_id>\d+) was successfully committed.*?",
    r"transaction_duration=(?P<tx_dur>\d+)ms, commit_duration=(?P<commit_dur>\d+)ms",
);

const FINISH: &str = r"Finishing (?:LOAD|UNLOAD) operation, id (?P<op_id>\d+)\.?";

/// Fields of a `Starting LOAD|UNLOAD operation` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartFields<'a> {
    pub operation_type: OperationType,
    pub operation_id: &'a str,
    pub topic: &'a str,
    pub scope: &'a str,
    pub locked_stores: &'a str,
}

/// The six event shapes the tracker reacts to. Ids are kept as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    Start(StartFields<'a>),
    DatastoreCommit {
        ds_tx_id: &'a str,
        transaction_ms: u64,
        commit_ms: u64,
    },
    DatastoreStart {
        ds_tx_id: &'a str,
    },
    PivotLink {
        ap_tx_id: &'a str,
        ds_tx_id: &'a str,
    },
    PivotCommit {
        ap_tx_id: &'a str,
        pivot: &'a str,
        transaction_ms: u64,
        commit_ms: u64,
    },
    Finish {
        operation_id: &'a str,
    },
}

/// Precompiled event patterns. Built once per scanner.
#[derive(Debug, Clone)]
pub struct EventPatterns {
    start: Regex,
    ds_commit: Regex,
    ds_start: Regex,
    pivot_link: Regex,
    pivot_commit: Regex,
    finish: Regex,
}

impl EventPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            start: Regex::new(START)?,
            ds_commit: Regex::new(DS_COMMIT)?,
            ds_start: Regex::new(DS_START)?,
            pivot_link: Regex::new(PIVOT_LINK)?,
            pivot_commit: Regex::new(PIVOT_COMMIT)?,
            finish: Regex::new(FINISH)?,
        })
    }

    /// Matches a start line. Checked on its own because the tracker buffers
    /// every other line before classifying it.
    pub fn start<'a>(&self, text: &'a str) -> Option<StartFields<'a>> {
        let caps = self.start.captures(text)?;
        Some(StartFields {
            operation_type: OperationType::parse(group(&caps, "type")?)?,
            operation_id: group(&caps, "op_id")?,
            topic: group(&caps, "topic")?,
            scope: group(&caps, "scope")?,
            locked_stores: group(&caps, "locked_stores")?,
        })
    }

    /// Classifies a non-start line. First match wins, in tracker priority
    /// order.
    pub fn correlated<'a>(&self, text: &'a str) -> Option<Event<'a>> {
        if let Some(caps) = self.ds_commit.captures(text) {
            return Some(Event::DatastoreCommit {
                ds_tx_id: group(&caps, "ds_tx_id")?,
                transaction_ms: millis(&caps, "tx_dur")?,
                commit_ms: millis(&caps, "commit_dur")?,
            });
        }

        if let Some(caps) = self.ds_start.captures(text) {
            return Some(Event::DatastoreStart {
                ds_tx_id: group(&caps, "ds_tx_id")?,
            });
        }

        if let Some(caps) = self.pivot_link.captures(text) {
            return Some(Event::PivotLink {
                ap_tx_id: group(&caps, "ap_tx_id")?,
                ds_tx_id: group(&caps, "ds_tx_id")?,
            });
        }

        if let Some(caps) = self.pivot_commit.captures(text) {
            return Some(Event::PivotCommit {
                ap_tx_id: group(&caps, "ap_tx_id")?,
                pivot: group(&caps, "pivot")?,
                transaction_ms: millis(&caps, "tx_dur")?,
                commit_ms: millis(&caps, "commit_dur")?,
            });
        }

        let caps = self.finish.captures(text)?;
        Some(Event::Finish {
            operation_id: group(&caps, "op_id")?,
        })
    }

    /// Full classification of one cleaned line.
    pub fn classify<'a>(&self, text: &'a str) -> Option<Event<'a>> {
        match self.start(text) {
            Some(start) => Some(Event::Start(start)),
            None => self.correlated(text),
        }
    }
}

fn group<'a>(caps: &Captures<'a>, name: &str) -> Option<&'a str> {
    caps.name(name).map(|m| m.as_str())
}

fn millis(caps: &Captures<'_>, name: &str) -> Option<u64> {
    group(caps, name)?.parse().ok()
}
