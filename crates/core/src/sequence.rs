//! Fold a chronological client log into the newest-first visual trace.

use crate::client_log::{ClientLog, ClientLogEntry, ClientLogItem, SynchronizationState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a trace row.
///
/// Entries are keyed by their 1-based chronological position, so the key of
/// an existing row never changes when newer entries are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Initial,
    Entry(usize),
}

impl RowKey {
    /// Index of this row in the newest-first sequence of a log with
    /// `log_len` entries.
    pub fn position(self, log_len: usize) -> usize {
        match self {
            RowKey::Initial => log_len,
            RowKey::Entry(n) => log_len.saturating_sub(n),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Initial => f.write_str("initial-state"),
            RowKey::Entry(n) => write!(f, "log-entry-{n}"),
        }
    }
}

/// One row of the rendered trace.
#[derive(Debug)]
pub struct TraceRow<'a, P> {
    pub key: RowKey,
    /// `None` only for the oldest row, which shows the initial state.
    pub entry: Option<&'a ClientLogEntry<P>>,
    /// State that resulted from `entry` (or the initial state).
    pub state: &'a SynchronizationState<P>,
}

/// Newest-first rows, terminated by the entry-less initial state.
pub fn fold_trace<'a, P>(
    log: &'a [ClientLogItem<P>],
    initial_state: &'a SynchronizationState<P>,
) -> Vec<TraceRow<'a, P>> {
    let mut rows: Vec<TraceRow<'a, P>> = log
        .iter()
        .enumerate()
        .rev()
        .map(|(i, item)| TraceRow {
            key: RowKey::Entry(i + 1),
            entry: Some(&item.entry),
            state: &item.new_state,
        })
        .collect();
    rows.push(TraceRow {
        key: RowKey::Initial,
        entry: None,
        state: initial_state,
    });
    rows
}

/// A client log together with the state it started from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "P: Deserialize<'de>")
)]
pub struct ClientTrace<P> {
    pub initial_state: SynchronizationState<P>,
    #[serde(default)]
    pub log: ClientLog<P>,
}

impl<P> ClientTrace<P> {
    pub fn new(initial_state: SynchronizationState<P>) -> Self {
        Self {
            initial_state,
            log: Vec::new(),
        }
    }

    /// Record a transition. Existing items are never touched.
    pub fn append(&mut self, entry: ClientLogEntry<P>, new_state: SynchronizationState<P>) {
        self.log.push(ClientLogItem { entry, new_state });
    }

    pub fn rows(&self) -> Vec<TraceRow<'_, P>> {
        fold_trace(&self.log, &self.initial_state)
    }

    /// State after the newest entry.
    pub fn current_state(&self) -> &SynchronizationState<P> {
        self.log
            .last()
            .map(|item| &item.new_state)
            .unwrap_or(&self.initial_state)
    }
}
