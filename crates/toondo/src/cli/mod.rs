//! # CLI Behavior
//!
//! This is **one possible UI client** for toondo. It is the only place that
//! knows about terminal I/O, exit codes and output formatting.
//!
//! ## Naked Execution (`toondo`)
//!
//! Running `toondo` with no arguments defaults to `toondo list`.
//!
//! ## Words Become the Description
//!
//! `toondo add buy milk` and `toondo add "buy milk"` are the same task: the
//! remaining arguments are joined with single spaces. `delete` works the same
//! way and removes every task with that description; `delete --id <id>`
//! removes one task by id.
//!
//! ## Module Structure
//!
//! - `setup.rs`: clap definitions
//! - `commands.rs`: logging, context init and dispatch
//! - `render.rs`: colored terminal and JSON output

mod commands;
mod render;
mod setup;

pub use commands::run;
