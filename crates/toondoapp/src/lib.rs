//! # Toondo Architecture
//!
//! Toondo is a **UI-agnostic task list library**. The task list is a single
//! plain text file in a compact tabular format that humans can read and edit,
//! and every change rewrites that file as a whole.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (the `toondo` crate)                                   │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Input validation, user facing messages                   │
//! │  - Returns structured `CmdResult`                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TaskStore: serialized read-modify-write of the task file │
//! │  - StorageBackend: FsBackend (production), MemBackend (test)│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec (codec/)                                             │
//! │  - Stateless text <-> Document transform                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout or stderr. Diagnostics go through the
//! `log` facade and the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Codec and store** (`codec/`, `store/`): unit tests against
//!    `MemBackend`, no filesystem.
//! 2. **Commands** (`commands/*.rs`): result contents and messages.
//! 3. **Integration** (`tests/`): real files in temp directories, including
//!    concurrent writers.

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod store;

#[cfg(test)]
mod test_utils;
