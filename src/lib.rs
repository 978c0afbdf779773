//! Client for a code-generation backend.
//!
//! The page flows (generate, copy, connection polling, history) live in
//! [`flows`] and operate on the [`page`] view-model. [`shell`] and [`cli`]
//! are the terminal front ends.

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod diagnostics;
pub mod flows;
pub mod page;
pub mod render;
pub mod shell;
