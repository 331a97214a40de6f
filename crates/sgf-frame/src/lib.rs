//! SGF sensor mesh radio frames
//!
//! This crate provides types and utilities for talking to the XBee ZigBee
//! coordinator radio of an SGF sensor mesh in API mode. Every message is a
//! delimited, checksummed frame whose body is a flat run of fixed-width,
//! null-terminated and trailing fields.
//!
//! # Protocol Overview
//!
//! - **Inbound frames** (radio → host): node identification, received data,
//!   IO samples, AT command responses and transmit status, see [`InboundFrame`]
//! - **Outbound requests** (host → radio): [`TransmitRequest`] to a node and
//!   local [`AtCommand`]s such as node discovery
//! - **Node descriptors**: the record a node uses to identify itself, see
//!   [`NodeDescriptor`]
//!
//! # Example
//!
//! ```rust,ignore
//! use sgf_frame::{FrameReader, InboundFrame, NodeDescriptor};
//!
//! let mut reader = FrameReader::new();
//! reader.feed(&bytes_from_serial);
//! while let Some(frame) = reader.next_frame() {
//!     if let Ok(InboundFrame::NodeIdentification { descriptor, .. }) = frame {
//!         let node = NodeDescriptor::decode(&descriptor)?;
//!     }
//! }
//! ```

mod constants;
mod descriptor;
mod error;
mod frame;
mod inbound;
pub mod layout;
mod outbound;
mod types;

pub use constants::*;
pub use descriptor::*;
pub use error::*;
pub use frame::*;
pub use inbound::*;
pub use outbound::*;
pub use types::*;
