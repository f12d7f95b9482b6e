//! Chatelaine is a terminal-first chat client for character companion
//! services.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the character roster, per-character
//!   session bookkeeping, the active-selection tracker, and the send flow.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`api`] defines the chat wire payloads and the HTTP client used to
//!   reach the remote service.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`]
//! for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
