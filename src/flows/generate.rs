//! Generation flow: submit the prompt and render code, explanation and
//! sources.

use super::{Flow, PageController};
use crate::api::BackendApi;
use crate::clipboard::Clipboard;
use crate::page::EMPTY_PROMPT_ALERT;

/// How a call to [`PageController::generate`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Prompt was empty; nothing was sent.
    Rejected,
    /// The response was rendered.
    Rendered,
    /// The request failed; the error texts were rendered.
    Failed,
    /// A newer generation was started meanwhile; this response was dropped.
    Stale,
}

/// Hides the loading indicator when dropped, unless a newer generation now
/// owns it.
struct LoadingGuard<'a, B: BackendApi, C: Clipboard> {
    controller: &'a PageController<B, C>,
    ticket: u64,
}

impl<B: BackendApi, C: Clipboard> Drop for LoadingGuard<'_, B, C> {
    fn drop(&mut self) {
        let mut page = self.controller.page();
        if self.controller.tickets.is_current(Flow::Generation, self.ticket) {
            page.loading.hide();
        }
    }
}

impl<B: BackendApi, C: Clipboard> PageController<B, C> {
    /// Submit the current prompt.
    ///
    /// An empty prompt queues an alert and returns without a network call.
    /// Whitespace counts as content and is sent as typed. Otherwise the
    /// output panels are cleared and the loading indicator is shown for the
    /// duration of the request. Then the response or the fixed error texts
    /// are rendered.
    pub fn generate(&self) -> GenerateOutcome {
        let prompt = {
            let mut page = self.page();
            if page.prompt.is_empty() {
                page.alert(EMPTY_PROMPT_ALERT);
                return GenerateOutcome::Rejected;
            }
            page.prompt.clone()
        };

        let ticket = self.tickets.issue(Flow::Generation);
        {
            let mut page = self.page();
            page.loading.show();
            page.clear_output();
        }
        let _loading = LoadingGuard {
            controller: self,
            ticket,
        };

        let result = self.backend.generate(&prompt);
        if let Err(e) = &result {
            self.record("generate", e);
        }

        let mut page = self.page();
        if !self.tickets.is_current(Flow::Generation, ticket) {
            return GenerateOutcome::Stale;
        }

        match result {
            Ok(generated) => {
                page.show_generation(&generated);
                GenerateOutcome::Rendered
            }
            Err(_) => {
                page.show_generation_error();
                GenerateOutcome::Failed
            }
        }
    }

    /// Type `prompt` into the prompt field and submit it.
    pub fn generate_for(&self, prompt: impl Into<String>) -> GenerateOutcome {
        self.set_prompt(prompt);
        self.generate()
    }
}
