//! History flow: list, delete and inspect past requests.

use super::{Flow, PageController};
use crate::api::{BackendApi, HistoryId};
use crate::clipboard::Clipboard;
use crate::page::{HISTORY_FAILED_TEXT, HistoryDetails, HistoryList, HistoryRow};

/// How a call to [`PageController::open_history`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// Rows were rendered.
    Loaded(usize),
    Empty,
    Failed,
    /// The dialog was reopened meanwhile; this response was dropped.
    Stale,
}

impl<B: BackendApi, C: Clipboard> PageController<B, C> {
    /// Show the history dialog and load the full history into it.
    pub fn open_history(&self) -> HistoryOutcome {
        let ticket = self.tickets.issue(Flow::History);
        {
            let mut page = self.page();
            page.history.list = HistoryList::Loading;
            page.history.visible = true;
        }

        let fetched = self.backend.history();
        if let Err(e) = &fetched {
            self.record("history", e);
        }

        let mut page = self.page();
        if !self.tickets.is_current(Flow::History, ticket) {
            return HistoryOutcome::Stale;
        }

        let (list, outcome) = match fetched {
            Ok(items) if items.is_empty() => (HistoryList::Empty, HistoryOutcome::Empty),
            Ok(items) => {
                let count = items.len();
                let rows = items.into_iter().map(HistoryRow::new).collect();
                (HistoryList::Rows(rows), HistoryOutcome::Loaded(count))
            }
            Err(_) => (
                HistoryList::Failed(HISTORY_FAILED_TEXT.to_string()),
                HistoryOutcome::Failed,
            ),
        };
        page.history.list = list;
        outcome
    }

    /// Hide the history dialog. Its rows and details are kept.
    pub fn close_history(&self) {
        self.page().history.visible = false;
    }

    /// Delete a history entry.
    ///
    /// The row disappears from the list right away and stays gone whether
    /// or not the backend accepts the delete; a rejected delete only shows
    /// up in the diagnostics log. Never opens the details view.
    ///
    /// Returns whether a visible row was removed.
    pub fn delete_history(&self, id: &HistoryId) -> bool {
        let removed = self.page().history.list.remove(id);

        if let Err(e) = self.backend.delete_history(id) {
            self.record("history", &e.context(format!("delete of history item {id}")));
        }

        removed
    }

    /// Show the full details of a listed entry.
    ///
    /// Returns `false` (and queues an alert) when no row has that id.
    pub fn show_details(&self, id: &HistoryId) -> bool {
        let mut page = self.page();
        let details = page.history.list.find(id).map(|row| HistoryDetails::from_item(&row.item));

        match details {
            Some(details) => {
                page.history.details = Some(details);
                true
            }
            None => {
                page.alert(format!("No history entry with id {id}"));
                false
            }
        }
    }
}
