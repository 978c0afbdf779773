/// Integration tests for the history dialog: listing, deleting and the
/// details view.
mod common;

use std::thread;

use codegen_client::api::HistoryId;
use codegen_client::flows::HistoryOutcome;
use codegen_client::page::{HISTORY_FAILED_TEXT, HistoryList, RenderedLink};

use common::{controller, controller_with_log, history_item, wait_until};

fn listed_ids(list: &HistoryList) -> Vec<HistoryId> {
    list.rows().iter().map(|row| row.id().clone()).collect()
}

#[test]
fn empty_history_shows_placeholder() {
    let controller = controller();
    controller.backend().push_history(Ok(vec![]));

    assert_eq!(controller.open_history(), HistoryOutcome::Empty);

    let page = controller.snapshot();
    assert!(page.history.visible);
    assert_eq!(page.history.list, HistoryList::Empty);
}

#[test]
fn every_item_becomes_a_row_in_order() {
    let controller = controller();
    controller.backend().push_history(Ok(vec![
        history_item(3, "reverse a string", "{}"),
        history_item(2, "sort a list", "{}"),
        history_item(1, "hello world", "{}"),
    ]));

    assert_eq!(controller.open_history(), HistoryOutcome::Loaded(3));

    let page = controller.snapshot();
    assert_eq!(
        listed_ids(&page.history.list),
        vec![HistoryId::Number(3), HistoryId::Number(2), HistoryId::Number(1)]
    );
    assert_eq!(page.history.list.rows()[1].prompt(), "sort a list");
}

#[test]
fn fetch_failure_replaces_loading_placeholder() {
    let (controller, diagnostics) = controller_with_log("history-fetch");
    controller
        .backend()
        .push_history(Err("history request failed: backend returned HTTP 500"));

    assert_eq!(controller.open_history(), HistoryOutcome::Failed);
    assert_eq!(
        controller.page().history.list,
        HistoryList::Failed(HISTORY_FAILED_TEXT.to_string())
    );
    assert_eq!(diagnostics.read_all()[0].flow, "history");
}

#[test]
fn reopening_fetches_again() {
    let controller = controller();
    controller
        .backend()
        .push_history(Ok(vec![history_item(1, "a", "{}")]));
    controller.open_history();
    controller.close_history();
    assert!(!controller.page().history.visible);

    controller.open_history();
    assert_eq!(controller.backend().history_calls(), 2);
    assert!(controller.page().history.visible);
    assert_eq!(controller.page().history.list, HistoryList::Empty);
}

#[test]
fn slow_fetch_does_not_overwrite_a_newer_one() {
    let controller = controller();
    let backend = controller.backend();
    backend.push_history(Ok(vec![history_item(1, "stale row", "{}")]));
    backend.push_history(Ok(vec![
        history_item(2, "fresh row", "{}"),
        history_item(3, "another fresh row", "{}"),
    ]));
    let release = backend.hold_next_history();

    let slow = {
        let controller = controller.clone();
        thread::spawn(move || controller.open_history())
    };
    assert!(wait_until(|| controller.backend().history_calls() == 1));

    assert_eq!(controller.open_history(), HistoryOutcome::Loaded(2));

    release.send(()).unwrap();
    assert_eq!(slow.join().unwrap(), HistoryOutcome::Stale);
    assert_eq!(
        listed_ids(&controller.page().history.list),
        vec![HistoryId::Number(2), HistoryId::Number(3)]
    );
}

#[test]
fn delete_removes_row_and_calls_backend() {
    let controller = controller();
    controller.backend().push_history(Ok(vec![
        history_item(1, "a", "{}"),
        history_item(2, "b", "{}"),
    ]));
    controller.open_history();

    assert!(controller.delete_history(&HistoryId::Number(1)));

    assert_eq!(controller.backend().deleted(), vec![HistoryId::Number(1)]);
    assert_eq!(
        listed_ids(&controller.page().history.list),
        vec![HistoryId::Number(2)]
    );
}

#[test]
fn failed_delete_still_removes_row() {
    let (controller, diagnostics) = controller_with_log("history-delete");
    controller
        .backend()
        .push_history(Ok(vec![history_item(7, "a", "{}"), history_item(8, "b", "{}")]));
    controller.backend().fail_deletes();
    controller.open_history();

    assert!(controller.delete_history(&HistoryId::Number(7)));

    let mut page = controller.snapshot();
    assert_eq!(listed_ids(&page.history.list), vec![HistoryId::Number(8)]);
    assert!(page.take_alerts().is_empty());

    let entries = diagnostics.read_all();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].message.contains("history item 7"));
    assert!(entries[0].message.contains("backend refused delete"));
}

#[test]
fn deleting_does_not_open_details() {
    let controller = controller();
    controller
        .backend()
        .push_history(Ok(vec![history_item(1, "a", r#"{"code":"x"}"#)]));
    controller.open_history();

    controller.delete_history(&HistoryId::Number(1));

    assert!(controller.page().history.details.is_none());
}

#[test]
fn deleting_the_last_row_leaves_an_empty_list() {
    let controller = controller();
    controller
        .backend()
        .push_history(Ok(vec![history_item(1, "a", "{}")]));
    controller.open_history();

    controller.delete_history(&HistoryId::Number(1));

    assert!(controller.page().history.list.rows().is_empty());
}

#[test]
fn details_render_stored_json() {
    let controller = controller();
    controller.backend().push_history(Ok(vec![history_item(
        4,
        "reverse a string",
        r#"{"code":"def f(s): return s[::-1]","explanation":"slices","resources":[{"url":"https://x.io","title":"X"},"https://y.io"]}"#,
    )]));
    controller.open_history();

    assert!(controller.show_details(&HistoryId::Number(4)));

    let page = controller.snapshot();
    let details = page.history.details.expect("details shown");
    assert_eq!(details.prompt, "reverse a string");
    assert_eq!(details.code, "def f(s): return s[::-1]");
    assert_eq!(details.explanation, "slices");
    assert_eq!(
        details.resources,
        vec![
            RenderedLink {
                href: "https://x.io".to_string(),
                label: "X".to_string(),
            },
            RenderedLink {
                href: "https://y.io".to_string(),
                label: "https://y.io".to_string(),
            },
        ]
    );
}

#[test]
fn details_of_non_json_response_show_raw_code() {
    let controller = controller();
    controller.backend().push_history(Ok(vec![history_item(
        5,
        "broken",
        "Here is your code: print('hi')",
    )]));
    controller.open_history();

    assert!(controller.show_details(&HistoryId::Number(5)));

    let details = controller.snapshot().history.details.expect("details shown");
    assert_eq!(details.code, "Here is your code: print('hi')");
    assert!(details.explanation.is_empty());
    assert!(details.resources.is_empty());
}

#[test]
fn details_for_unknown_id_alerts() {
    let controller = controller();
    controller.open_history();

    assert!(!controller.show_details(&HistoryId::Number(99)));
    assert_eq!(
        controller.page().take_alerts(),
        vec!["No history entry with id 99".to_string()]
    );
}
