//! SGF operator console
//!
//! This crate turns operator command lines into typed commands and the
//! request payloads those commands send to sensor nodes.
//!
//! # Command Overview
//!
//! Commands are whitespace separated words. The first word selects the verb
//! and is case-insensitive:
//!
//! | Word | Verb | Effect |
//! |------|------|--------|
//! | `q` | shutdown | stop the radio and exit |
//! | `s` | request status | send `ST?` to every node |
//! | `i` | request id | send `ID?` to every node |
//! | `c` | request config | send `CF?` to every node |
//! | `n` | discover nodes | issue an `ND` AT command |
//! | `k <node> <values...>` | set config | send `CF:<values...>` to matching nodes |
//!
//! # Example
//!
//! ```rust,ignore
//! use sgf_console::{Command, Request};
//!
//! let cmd = Command::parse("k ABCDE12 1 20")?;
//! ```

mod commands;
mod error;
mod requests;

pub use commands::*;
pub use error::*;
pub use requests::*;
