/// Integration tests for the interactive shell session.
///
/// Sessions are driven from an in-memory script with polling disabled, so
/// exactly one connection check runs at startup.
mod common;

use std::io::Cursor;

use codegen_client::api::ResourceLink;
use codegen_client::config::schema::PollingConfig;
use codegen_client::render;
use codegen_client::shell::run_session;

use common::{controller, generation, history_item};

fn no_polling() -> PollingConfig {
    PollingConfig {
        enabled: false,
        interval_ms: 5_000,
    }
}

fn run_script(
    controller: &codegen_client::flows::PageController<common::FakeBackend, common::RecordingClipboard>,
    script: &str,
) -> String {
    render::set_color(false);
    let mut out = Vec::new();
    run_session(controller, &no_polling(), Cursor::new(script.to_string()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn startup_checks_connection_once() {
    let controller = controller();
    let output = run_script(&controller, "quit\n");

    assert_eq!(controller.backend().connection_calls(), 1);
    assert!(output.starts_with("[Connection: Online] > "));
}

#[test]
fn generate_prints_panels() {
    let controller = controller();
    controller.backend().push_generate(Ok(generation(
        "def f(s): return s[::-1]",
        "Slices backwards.",
        vec![ResourceLink::Url("https://x.io".to_string())],
    )));

    let output = run_script(&controller, "gen reverse a string\n");

    assert!(output.contains("def f(s): return s[::-1]"));
    assert!(output.contains("Slices backwards."));
    assert!(output.contains("  • https://x.io"));
    assert_eq!(
        *controller.backend().prompts.lock().unwrap(),
        vec!["reverse a string".to_string()]
    );
}

#[test]
fn generate_without_prompt_alerts() {
    let controller = controller();
    let output = run_script(&controller, "generate\n");

    assert!(output.contains("! Enter a prompt to generate code!"));
    assert_eq!(controller.backend().generate_calls(), 0);
}

#[test]
fn prompt_then_generate_uses_typed_prompt() {
    let controller = controller();
    let _ = run_script(&controller, "prompt sort a list\ngenerate\n");

    assert_eq!(
        *controller.backend().prompts.lock().unwrap(),
        vec!["sort a list".to_string()]
    );
}

#[test]
fn copy_shows_toast_or_alert() {
    let controller = controller();
    let output = run_script(&controller, "copy\n");
    assert!(output.contains("! No code to copy!"));

    let controller = common::controller();
    controller
        .backend()
        .push_generate(Ok(generation("x = 1", "x", vec![])));
    let output = run_script(&controller, "gen assign\ncopy\n");
    assert!(output.contains("✓ Code copied!"));
}

#[test]
fn history_rows_can_be_shown_and_deleted_by_position() {
    let controller = controller();
    controller.backend().push_history(Ok(vec![
        history_item(10, "reverse a string", r#"{"code":"s[::-1]","explanation":"slices"}"#),
        history_item(11, "sort a list", "{}"),
    ]));

    let output = run_script(&controller, "history\nshow 1\ndel 2\nclose\n");

    assert!(output.contains("  1. reverse a string [#10]"));
    assert!(output.contains("s[::-1]"));
    assert_eq!(
        controller.backend().deleted(),
        vec![codegen_client::api::HistoryId::Number(11)]
    );
    assert!(!controller.page().history.visible);
}

#[test]
fn unknown_row_alerts() {
    let controller = controller();
    let output = run_script(&controller, "show 3\n");

    assert!(output.contains("No such row"));
    assert!(controller.backend().deleted().is_empty());
}

#[test]
fn unknown_command_is_reported() {
    let controller = controller();
    let output = run_script(&controller, "launch rockets\nhelp\n");

    assert!(output.contains("unknown command 'launch'"));
    assert!(output.contains("Commands:"));
}

#[test]
fn status_reports_current_connection() {
    let controller = controller();
    controller.backend().push_connection(Ok(Default::default()));
    controller
        .backend()
        .push_connection(Err("connection refused"));

    let output = run_script(&controller, "status\n");

    assert!(output.contains("[Connection: Offline (unknown)] > "));
    assert!(output.contains("Connection: Offline (Network error)"));
}
