//! System clipboard access.
//!
//! There is no clipboard API in the standard library, so text is piped into
//! the platform's clipboard utility, the same way the platform's browser
//! opener is spawned for URLs.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Somewhere copied code can go.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

impl<T: Clipboard + ?Sized> Clipboard for std::sync::Arc<T> {
    fn write_text(&self, text: &str) -> Result<()> {
        (**self).write_text(text)
    }
}

/// The operating system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Clipboard utilities to try, in order.
    fn candidates() -> Vec<(&'static str, &'static [&'static str])> {
        #[cfg(target_os = "macos")]
        {
            const NO_ARGS: &[&str] = &[];
            vec![("pbcopy", NO_ARGS)]
        }

        #[cfg(target_os = "windows")]
        {
            const NO_ARGS: &[&str] = &[];
            vec![("clip", NO_ARGS)]
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            const NO_ARGS: &[&str] = &[];
            const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];
            const XSEL_ARGS: &[&str] = &["--clipboard", "--input"];
            vec![
                ("wl-copy", NO_ARGS),
                ("xclip", XCLIP_ARGS),
                ("xsel", XSEL_ARGS),
            ]
        }
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut last_error = None;

        for (program, args) in Self::candidates() {
            match pipe_into(program, args, text) {
                Ok(()) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("no clipboard utility configured")))
    }
}

/// Spawn `program`, write `text` to its stdin and wait for it to succeed.
fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    {
        let mut stdin = child
            .stdin
            .take()
            .with_context(|| format!("{program} has no stdin"))?;
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed writing to {program}"))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("failed waiting for {program}"))?;
    if !status.success() {
        anyhow::bail!("{program} exited with {status}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_an_error() {
        let err = pipe_into("codegen-no-such-clipboard-tool", &[], "x").unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn candidates_are_not_empty() {
        assert!(!SystemClipboard::candidates().is_empty());
    }
}
