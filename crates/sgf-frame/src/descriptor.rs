//! Node descriptor records.
//!
//! A node descriptor is carried both in node identification indicators and in
//! the parameter of each `ND` (node discovery) AT response:
//!
//! | Field              | Size (bytes)    |
//! |--------------------|-----------------|
//! | source_addr        | 2               |
//! | source_addr_long   | 8               |
//! | node_id            | null terminated |
//! | parent_source_addr | 2               |
//! | device_type        | 1               |
//! | source_event       | 1               |
//! | digi_profile_id    | 2               |
//! | manufacturer_id    | 2               |
//!
//! Multi-byte integers are big-endian.

use serde::{Deserialize, Serialize};

use crate::error::FrameResult;
use crate::layout::{self, Field, Layout};
use crate::types::{DeviceRole, LongAddress, ShortAddress};

/// Wire layout of a node descriptor.
pub const NODE_DESCRIPTOR_LAYOUT: &Layout = &[
    Field::fixed("source_addr", 2),
    Field::fixed("source_addr_long", 8),
    Field::null_terminated("node_id"),
    Field::fixed("parent_source_addr", 2),
    Field::fixed("device_type", 1),
    Field::fixed("source_event", 1),
    Field::fixed("digi_profile_id", 2),
    Field::fixed("manufacturer_id", 2),
];

/// Metadata identifying a node on the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Network address.
    pub short_address: ShortAddress,
    /// Hardware address.
    pub long_address: LongAddress,
    /// Operator-facing node identifier (the radio's `NI` string).
    pub node_id: String,
    /// Network address of the parent router.
    pub parent_short_address: ShortAddress,
    /// ZigBee device type.
    pub device_type: u8,
    /// What caused the node to announce itself.
    pub source_event: u8,
    /// Digi profile identifier.
    pub profile_id: u16,
    /// Manufacturer identifier.
    pub manufacturer_id: u16,
}

impl NodeDescriptor {
    /// Decode a descriptor from its wire form.
    pub fn decode(data: &[u8]) -> FrameResult<Self> {
        let fields = layout::decode(data, NODE_DESCRIPTOR_LAYOUT)?;
        if fields.consumed() < data.len() {
            log::trace!("ignoring {} bytes after node descriptor", data.len() - fields.consumed());
        }
        Ok(NodeDescriptor {
            short_address: ShortAddress(fields.array("source_addr")?),
            long_address: LongAddress(fields.array("source_addr_long")?),
            node_id: String::from_utf8_lossy(fields.require("node_id")?).into_owned(),
            parent_short_address: ShortAddress(fields.array("parent_source_addr")?),
            device_type: fields.byte("device_type")?,
            source_event: fields.byte("source_event")?,
            profile_id: u16::from_be_bytes(fields.array("digi_profile_id")?),
            manufacturer_id: u16::from_be_bytes(fields.array("manufacturer_id")?),
        })
    }

    /// Encode the descriptor to its wire form.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(19 + self.node_id.len());
        buf.extend_from_slice(self.short_address.as_bytes());
        buf.extend_from_slice(self.long_address.as_bytes());
        buf.extend_from_slice(self.node_id.as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.parent_short_address.as_bytes());
        buf.push(self.device_type);
        buf.push(self.source_event);
        buf.extend_from_slice(&self.profile_id.to_be_bytes());
        buf.extend_from_slice(&self.manufacturer_id.to_be_bytes());
        buf
    }

    /// ZigBee role of the node.
    pub fn role(&self) -> DeviceRole {
        DeviceRole::from(self.device_type)
    }
}
