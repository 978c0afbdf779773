//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Result, anyhow};
use codegen_client::api::{
    BackendApi, ConnectionStatus, GenerationResult, HistoryId, HistoryItem, ResourceLink,
};
use codegen_client::clipboard::Clipboard;
use codegen_client::diagnostics::Diagnostics;
use codegen_client::flows::PageController;

type Script<T> = Mutex<VecDeque<Result<T, String>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

fn next<T>(script: &Script<T>, default: impl FnOnce() -> T) -> Result<T> {
    match lock(script).pop_front() {
        Some(Ok(value)) => Ok(value),
        Some(Err(message)) => Err(anyhow!(message)),
        None => Ok(default()),
    }
}

/// Scripted in-memory backend.
///
/// Each operation answers from its queue of scripted results and falls back
/// to a harmless default (empty generation, online, empty history) once the
/// queue is drained.
#[derive(Default)]
pub struct FakeBackend {
    generate_script: Script<GenerationResult>,
    connection_script: Script<ConnectionStatus>,
    history_script: Script<Vec<HistoryItem>>,
    fail_delete: AtomicBool,

    generate_hold: Mutex<Option<Receiver<()>>>,
    connection_hold: Mutex<Option<Receiver<()>>>,
    history_hold: Mutex<Option<Receiver<()>>>,
    connection_delay: Mutex<Duration>,

    pub generate_calls: AtomicUsize,
    pub connection_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<HistoryId>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_generate(&self, result: Result<GenerationResult, &str>) {
        lock(&self.generate_script).push_back(result.map_err(str::to_string));
    }

    pub fn push_connection(&self, result: Result<ConnectionStatus, &str>) {
        lock(&self.connection_script).push_back(result.map_err(str::to_string));
    }

    pub fn push_history(&self, result: Result<Vec<HistoryItem>, &str>) {
        lock(&self.history_script).push_back(result.map_err(str::to_string));
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// Make the next generate call block until the returned sender fires.
    pub fn hold_next_generate(&self) -> Sender<()> {
        let (release, held) = mpsc::channel();
        *lock(&self.generate_hold) = Some(held);
        release
    }

    /// Make the next connection check block until the returned sender fires.
    pub fn hold_next_connection(&self) -> Sender<()> {
        let (release, held) = mpsc::channel();
        *lock(&self.connection_hold) = Some(held);
        release
    }

    /// Make the next history fetch block until the returned sender fires.
    pub fn hold_next_history(&self) -> Sender<()> {
        let (release, held) = mpsc::channel();
        *lock(&self.history_hold) = Some(held);
        release
    }

    /// Make every connection check take at least `delay`.
    pub fn slow_connections(&self, delay: Duration) {
        *lock(&self.connection_delay) = delay;
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn connection_calls(&self) -> usize {
        self.connection_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<HistoryId> {
        lock(&self.deleted).clone()
    }
}

fn wait_if_held(hold: &Mutex<Option<Receiver<()>>>) -> Option<Receiver<()>> {
    lock(hold).take()
}

impl BackendApi for FakeBackend {
    fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let held = wait_if_held(&self.generate_hold);
        lock(&self.prompts).push(prompt.to_string());
        let result = next(&self.generate_script, GenerationResult::default);
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(held) = held {
            let _ = held.recv_timeout(Duration::from_secs(5));
        }
        result
    }

    fn check_connection(&self) -> Result<ConnectionStatus> {
        let held = wait_if_held(&self.connection_hold);
        let result = next(&self.connection_script, ConnectionStatus::online);
        self.connection_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(held) = held {
            let _ = held.recv_timeout(Duration::from_secs(5));
        }
        let delay = *lock(&self.connection_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        result
    }

    fn history(&self) -> Result<Vec<HistoryItem>> {
        let held = wait_if_held(&self.history_hold);
        let result = next(&self.history_script, Vec::new);
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(held) = held {
            let _ = held.recv_timeout(Duration::from_secs(5));
        }
        result
    }

    fn delete_history(&self, id: &HistoryId) -> Result<()> {
        lock(&self.deleted).push(id.clone());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("backend refused delete"));
        }
        Ok(())
    }
}

/// Clipboard that remembers everything written to it.
#[derive(Default)]
pub struct RecordingClipboard {
    pub texts: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn texts(&self) -> Vec<String> {
        lock(&self.texts).clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        lock(&self.texts).push(text.to_string());
        Ok(())
    }
}

/// Clipboard that rejects every write.
#[derive(Default)]
pub struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn write_text(&self, _text: &str) -> Result<()> {
        Err(anyhow!("clipboard permission denied"))
    }
}

/// A diagnostics log in a fresh temp file.
pub fn temp_diagnostics(name: &str) -> (Diagnostics, PathBuf) {
    let dir = std::env::temp_dir().join(format!("codegen-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{name}.jsonl"));
    let _ = std::fs::remove_file(&path);
    (Diagnostics::at(path.clone()), path)
}

pub fn controller() -> PageController<FakeBackend, RecordingClipboard> {
    PageController::new(
        FakeBackend::new(),
        RecordingClipboard::default(),
        Diagnostics::disabled(),
    )
}

pub fn controller_with_log(
    name: &str,
) -> (PageController<FakeBackend, RecordingClipboard>, Diagnostics) {
    let (diagnostics, _) = temp_diagnostics(name);
    let controller = PageController::new(
        FakeBackend::new(),
        RecordingClipboard::default(),
        diagnostics.clone(),
    );
    (controller, diagnostics)
}

pub fn generation(code: &str, explanation: &str, resources: Vec<ResourceLink>) -> GenerationResult {
    GenerationResult {
        code: Some(code.to_string()),
        explanation: Some(explanation.to_string()),
        resources: Some(resources),
    }
}

pub fn history_item(id: i64, prompt: &str, response: &str) -> HistoryItem {
    HistoryItem {
        id: HistoryId::Number(id),
        prompt: prompt.to_string(),
        response: response.to_string(),
        created_at: None,
    }
}

/// Poll `condition` until it holds or a couple of seconds pass.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
