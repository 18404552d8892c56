//! Command-line front end.
//!
//! Components:
//! - `commands`: the `clap` subcommands.
//! - `controller_handler`: `Controller`, wiring configuration, store, session and repository.
//! - `render`: plain-text output of command results.

pub mod commands;
pub mod controller_handler;
pub mod render;

pub use commands::Command;
pub use controller_handler::Controller;
