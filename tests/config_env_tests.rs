/// Integration tests for environment variable overrides of the config.
///
/// # Safety
///
/// These tests use `std::env::set_var` / `remove_var`, which are `unsafe` in
/// Rust 2024 edition. All env mutation happens inside a single `#[test]` so
/// nothing else in this binary reads the variables concurrently.
use codegen_client::config;

/// Helper: set an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn set_env(key: &str, val: &str) {
    unsafe { std::env::set_var(key, val) }
}

/// Helper: remove an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

const VARS: &[&str] = &[
    "CODEGEN_URL",
    "CODEGEN_TIMEOUT_MS",
    "CODEGEN_POLLING",
    "CODEGEN_POLL_INTERVAL_MS",
    "CODEGEN_TOAST_MS",
    "CODEGEN_COLOR",
    "CODEGEN_DIAGNOSTICS",
    "NO_COLOR",
];

#[test]
fn env_vars_override_every_other_layer() {
    unsafe { set_env("CODEGEN_URL", "http://backend.test:9000") };
    unsafe { set_env("CODEGEN_TIMEOUT_MS", "1234") };
    unsafe { set_env("CODEGEN_POLLING", "0") };
    unsafe { set_env("CODEGEN_POLL_INTERVAL_MS", "250") };
    unsafe { set_env("CODEGEN_TOAST_MS", "900") };
    unsafe { set_env("CODEGEN_DIAGNOSTICS", "false") };
    unsafe { set_env("CODEGEN_COLOR", "1") };
    unsafe { remove_env("NO_COLOR") };

    let cfg = config::load();
    assert_eq!(cfg.backend.base_url, "http://backend.test:9000");
    assert_eq!(cfg.backend.timeout_ms, 1234);
    assert!(!cfg.polling.enabled);
    assert_eq!(cfg.polling.interval_ms, 250);
    assert_eq!(cfg.ui.toast_ms, 900);
    assert!(!cfg.diagnostics.enabled);
    assert!(cfg.ui.color);

    // NO_COLOR wins over everything else.
    unsafe { set_env("NO_COLOR", "1") };
    assert!(!config::load().ui.color);

    // Unparseable numbers are ignored.
    unsafe { set_env("CODEGEN_TIMEOUT_MS", "soon") };
    assert_ne!(config::load().backend.timeout_ms, 0);

    for var in VARS {
        unsafe { remove_env(var) };
    }
}
