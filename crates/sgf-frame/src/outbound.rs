//! Requests sent to the coordinator radio.

use crate::constants::*;
use crate::types::Destination;

/// Hands out frame ids for outbound requests.
///
/// Ids run 1..=255 and wrap. Zero is never issued since it tells the radio
/// not to send a status frame back.
#[derive(Debug, Clone)]
pub struct FrameIdSequence {
    next: u8,
}

impl Default for FrameIdSequence {
    fn default() -> Self {
        FrameIdSequence { next: 1 }
    }
}

impl FrameIdSequence {
    /// Create a sequence starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next frame id.
    pub fn next_id(&mut self) -> u8 {
        let id = self.next;
        self.next = if id == u8::MAX { 1 } else { id + 1 };
        id
    }
}

/// Transmit a payload to a remote node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitRequest {
    /// Frame id for the matching transmit status.
    pub frame_id: u8,
    /// Target node.
    pub destination: Destination,
    /// Application payload.
    pub payload: Vec<u8>,
}

impl TransmitRequest {
    /// Encode the request as frame data.
    ///
    /// Format: api_id(1) + frame_id(1) + dest_addr_long(8) + dest_addr(2) +
    /// broadcast_radius(1) + options(1) + payload
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(14 + self.payload.len());
        buf.push(API_TX_REQUEST);
        buf.push(self.frame_id);
        buf.extend_from_slice(self.destination.long_address.as_bytes());
        buf.extend_from_slice(self.destination.short_address.as_bytes());
        // Maximum hops, and default transmit options
        buf.push(0);
        buf.push(0);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// A local AT command for the coordinator radio itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtCommand {
    /// Frame id for the matching AT response.
    pub frame_id: u8,
    /// Two-character command name.
    pub command: [u8; 2],
    /// Optional parameter.
    pub parameter: Vec<u8>,
}

impl AtCommand {
    /// Node discovery.
    pub fn node_discover(frame_id: u8) -> Self {
        AtCommand {
            frame_id,
            command: AT_NODE_DISCOVER,
            parameter: Vec::new(),
        }
    }

    /// Encode the command as frame data.
    ///
    /// Format: api_id(1) + frame_id(1) + command(2) + parameter
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.parameter.len());
        buf.push(API_AT_COMMAND);
        buf.push(self.frame_id);
        buf.extend_from_slice(&self.command);
        buf.extend_from_slice(&self.parameter);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LongAddress, ShortAddress};

    #[test]
    fn test_frame_ids_skip_zero() {
        let mut ids = FrameIdSequence::new();
        assert_eq!(ids.next_id(), 1);
        for _ in 2..=255 {
            ids.next_id();
        }
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_encode_transmit_request() {
        let request = TransmitRequest {
            frame_id: 7,
            destination: Destination {
                short_address: ShortAddress([0x7D, 0x84]),
                long_address: LongAddress([1, 2, 3, 4, 5, 6, 7, 8]),
            },
            payload: b"ID?".to_vec(),
        };
        assert_eq!(
            request.encode(),
            vec![0x10, 7, 1, 2, 3, 4, 5, 6, 7, 8, 0x7D, 0x84, 0, 0, b'I', b'D', b'?']
        );
    }

    #[test]
    fn test_encode_node_discover() {
        assert_eq!(AtCommand::node_discover(3).encode(), vec![0x08, 3, b'N', b'D']);
    }
}
