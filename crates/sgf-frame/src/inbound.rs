//! Frames received from the coordinator radio.

use crate::constants::*;
use crate::error::{FrameError, FrameResult};
use crate::layout::{self, Field, Layout};
use crate::types::{LongAddress, ShortAddress};

const NODE_ID_INDICATOR_LAYOUT: &Layout = &[
    Field::fixed("sender_addr_long", 8),
    Field::fixed("sender_addr", 2),
    Field::fixed("options", 1),
    Field::remainder("descriptor"),
];

const RX_PACKET_LAYOUT: &Layout = &[
    Field::fixed("source_addr_long", 8),
    Field::fixed("source_addr", 2),
    Field::fixed("options", 1),
    Field::remainder("rf_data"),
];

const RX_IO_SAMPLE_LAYOUT: &Layout = &[
    Field::fixed("source_addr_long", 8),
    Field::fixed("source_addr", 2),
    Field::fixed("options", 1),
    Field::remainder("samples"),
];

const AT_RESPONSE_LAYOUT: &Layout = &[
    Field::fixed("frame_id", 1),
    Field::fixed("command", 2),
    Field::fixed("status", 1),
    Field::remainder("parameter"),
];

const TX_STATUS_LAYOUT: &Layout = &[
    Field::fixed("frame_id", 1),
    Field::fixed("dest_addr", 2),
    Field::fixed("retries", 1),
    Field::fixed("deliver_status", 1),
    Field::fixed("discover_status", 1),
];

/// Top-level frame kind, as tagged by the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Node identification broadcast.
    NodeIdentification,
    /// Application data from a node.
    Data,
    /// IO sample from a node.
    Sample,
    /// Response to a local AT command.
    AtResponse,
    /// Outcome of a transmit request.
    TxStatus,
    /// Anything else.
    Unrecognized,
}

/// A decoded frame from the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// A node announced itself.
    NodeIdentification {
        /// Hardware address of the radio that relayed the announcement.
        sender_long: LongAddress,
        /// Network address of the radio that relayed the announcement.
        sender: ShortAddress,
        /// Receive options.
        options: u8,
        /// Undecoded node descriptor.
        descriptor: Vec<u8>,
    },

    /// Application data.
    Data {
        /// Hardware address of the sender, if known.
        source_long: Option<LongAddress>,
        /// Network address of the sender, if known.
        source: Option<ShortAddress>,
        /// Receive options.
        options: u8,
        /// Application payload.
        rf_data: Vec<u8>,
    },

    /// IO sample.
    Sample {
        /// Hardware address of the sender.
        source_long: LongAddress,
        /// Network address of the sender.
        source: ShortAddress,
        /// Raw sample block.
        samples: Vec<u8>,
    },

    /// Response to a local AT command.
    AtResponse {
        /// Frame id of the request.
        frame_id: u8,
        /// Two-character AT command name.
        command: [u8; 2],
        /// Command status, zero on success.
        status: u8,
        /// Response parameter.
        parameter: Vec<u8>,
    },

    /// Outcome of a transmit request.
    TxStatus {
        /// Frame id of the request.
        frame_id: u8,
        /// Network address the request went to.
        dest: ShortAddress,
        /// Number of application retries.
        retries: u8,
        /// Delivery status, zero on success.
        deliver_status: u8,
        /// Route discovery status.
        discover_status: u8,
    },

    /// An API identifier this controller does not handle.
    Unrecognized {
        /// API identifier.
        api_id: u8,
        /// Frame body.
        body: Vec<u8>,
    },
}

impl InboundFrame {
    /// Decode frame data (API identifier followed by body).
    pub fn decode(frame: &[u8]) -> FrameResult<Self> {
        let (&api_id, body) = frame.split_first().ok_or(FrameError::EmptyFrame)?;

        match api_id {
            API_NODE_ID_INDICATOR => {
                let fields = layout::decode(body, NODE_ID_INDICATOR_LAYOUT)?;
                Ok(InboundFrame::NodeIdentification {
                    sender_long: LongAddress(fields.array("sender_addr_long")?),
                    sender: ShortAddress(fields.array("sender_addr")?),
                    options: fields.byte("options")?,
                    descriptor: fields.bytes_or_empty("descriptor"),
                })
            }

            API_RX_PACKET => {
                let fields = layout::decode(body, RX_PACKET_LAYOUT)?;
                Ok(InboundFrame::Data {
                    source_long: Some(LongAddress(fields.array("source_addr_long")?)),
                    source: Some(ShortAddress(fields.array("source_addr")?)),
                    options: fields.byte("options")?,
                    rf_data: fields.bytes_or_empty("rf_data"),
                })
            }

            API_RX_IO_SAMPLE => {
                let fields = layout::decode(body, RX_IO_SAMPLE_LAYOUT)?;
                Ok(InboundFrame::Sample {
                    source_long: LongAddress(fields.array("source_addr_long")?),
                    source: ShortAddress(fields.array("source_addr")?),
                    samples: fields.bytes_or_empty("samples"),
                })
            }

            API_AT_RESPONSE => {
                let fields = layout::decode(body, AT_RESPONSE_LAYOUT)?;
                Ok(InboundFrame::AtResponse {
                    frame_id: fields.byte("frame_id")?,
                    command: fields.array("command")?,
                    status: fields.byte("status")?,
                    parameter: fields.bytes_or_empty("parameter"),
                })
            }

            API_TX_STATUS => {
                let fields = layout::decode(body, TX_STATUS_LAYOUT)?;
                Ok(InboundFrame::TxStatus {
                    frame_id: fields.byte("frame_id")?,
                    dest: ShortAddress(fields.array("dest_addr")?),
                    retries: fields.byte("retries")?,
                    deliver_status: fields.byte("deliver_status")?,
                    discover_status: fields.byte("discover_status")?,
                })
            }

            _ => Ok(InboundFrame::Unrecognized {
                api_id,
                body: body.to_vec(),
            }),
        }
    }

    /// Top-level kind of this frame.
    pub fn kind(&self) -> FrameKind {
        match self {
            InboundFrame::NodeIdentification { .. } => FrameKind::NodeIdentification,
            InboundFrame::Data { .. } => FrameKind::Data,
            InboundFrame::Sample { .. } => FrameKind::Sample,
            InboundFrame::AtResponse { .. } => FrameKind::AtResponse,
            InboundFrame::TxStatus { .. } => FrameKind::TxStatus,
            InboundFrame::Unrecognized { .. } => FrameKind::Unrecognized,
        }
    }
}
