//! Transport layer between the controller and the coordinator radio.

use sgf_frame::Destination;

use crate::error::ControllerResult;

pub mod mock;
mod serial;

pub use serial::SerialRadio;

/// Outbound side of the coordinator radio.
///
/// Inbound frames arrive separately, on the channel handed out when the
/// transport is opened.
pub trait RadioTransport {
    /// Transmit an application payload to a remote node.
    fn transmit(&mut self, destination: &Destination, payload: &[u8]) -> ControllerResult<()>;

    /// Issue a local AT command to the coordinator.
    fn send_at(&mut self, command: [u8; 2], parameter: &[u8]) -> ControllerResult<()>;

    /// Stop the radio and release the port.
    ///
    /// Calling `halt` on an already halted transport does nothing.
    fn halt(&mut self) -> ControllerResult<()>;
}
