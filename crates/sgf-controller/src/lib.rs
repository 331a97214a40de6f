//! SGF sensor mesh controller
//!
//! Drives the coordinator radio of an SGF sensor mesh: keeps a registry of
//! the nodes that announce themselves, routes inbound frames to handlers and
//! sends operator requests out to nodes.
//!
//! # Structure
//!
//! - [`Registry`]: known nodes, keyed by network address
//! - [`Router`]: two-level dispatch of inbound frames into [`Report`]s
//! - [`Scheduler`]: paced fan-out of requests to nodes
//! - [`Session`]: ties the above to a [`RadioTransport`] and executes
//!   operator commands
//! - [`runner`]: the blocking run loop used by the `sgfctl` binary

mod config;
mod error;
mod registry;
mod report;
mod router;
pub mod runner;
mod scheduler;
mod session;
pub mod transport;

pub use config::*;
pub use error::*;
pub use registry::*;
pub use report::*;
pub use router::*;
pub use scheduler::*;
pub use session::*;
pub use transport::{RadioTransport, SerialRadio};
