//! Terminal UI layer for interactive chat sessions.
//!
//! The UI module owns rendering, layout, keyboard handling, and loop
//! control for the text user interface:
//! - [`chat_loop`]: the main interaction loop that feeds user input into
//!   [`crate::core::app`] and coordinates in-flight sends.
//! - [`renderer`]: view composition for the picker and chat screens.
//! - [`theme`]: color/style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns the domain logic.

pub mod chat_loop;
pub mod renderer;
pub mod theme;

/// Terminals narrower than this get the overlay sidebar treatment.
pub const NARROW_WIDTH: u16 = 80;
