//! Copy flow: put the displayed code on the clipboard.

use std::time::Instant;

use super::PageController;
use crate::api::BackendApi;
use crate::clipboard::Clipboard;
use crate::page::{COPIED_TOAST_TEXT, NOTHING_TO_COPY_ALERT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    NothingToCopy,
    Copied,
    /// Clipboard write failed. Only the diagnostics log knows why.
    Failed,
}

impl<B: BackendApi, C: Clipboard> PageController<B, C> {
    /// Copy the code panel to the clipboard.
    ///
    /// On success a "copied" toast is shown for the configured lifetime.
    pub fn copy_code(&self) -> CopyOutcome {
        let code = {
            let mut page = self.page();
            if page.output.is_empty() {
                page.alert(NOTHING_TO_COPY_ALERT);
                return CopyOutcome::NothingToCopy;
            }
            page.output.clone()
        };

        match self.clipboard.write_text(&code) {
            Ok(()) => {
                self.page()
                    .show_toast(COPIED_TOAST_TEXT, self.toast_ttl, Instant::now());
                CopyOutcome::Copied
            }
            Err(e) => {
                self.record("copy", &e);
                CopyOutcome::Failed
            }
        }
    }
}
