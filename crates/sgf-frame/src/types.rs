//! Common types used in the protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::*;

/// A 2-byte network address.
///
/// Assigned by the coordinator when a node joins and may be handed to a
/// different device after a reset, so it is not a durable identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShortAddress(pub [u8; 2]);

impl ShortAddress {
    /// Placeholder for frames whose sender the transport did not supply.
    pub const UNKNOWN: ShortAddress = ShortAddress([0x00, 0x00]);

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    /// Get the bytes as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for ShortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// An 8-byte hardware address, unique per radio module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LongAddress(pub [u8; 8]);

impl LongAddress {
    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Get the bytes as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for LongAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Where a transmit request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    /// Network address of the node.
    pub short_address: ShortAddress,
    /// Hardware address of the node.
    pub long_address: LongAddress,
}

/// ZigBee role reported in a node descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    /// Network coordinator.
    Coordinator,
    /// Router.
    Router,
    /// Sleepy end device.
    EndDevice,
    /// Value outside the documented set.
    Unknown(u8),
}

impl From<u8> for DeviceRole {
    fn from(value: u8) -> Self {
        match value {
            DEVICE_TYPE_COORDINATOR => DeviceRole::Coordinator,
            DEVICE_TYPE_ROUTER => DeviceRole::Router,
            DEVICE_TYPE_END_DEVICE => DeviceRole::EndDevice,
            other => DeviceRole::Unknown(other),
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRole::Coordinator => write!(f, "coordinator"),
            DeviceRole::Router => write!(f, "router"),
            DeviceRole::EndDevice => write!(f, "end device"),
            DeviceRole::Unknown(value) => write!(f, "unknown (0x{:02X})", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        assert_eq!(ShortAddress([0x1A, 0x2B]).to_string(), "0x1A2B");
        assert_eq!(
            LongAddress([0x00, 0x13, 0xA2, 0x00, 0x40, 0x8B, 0x12, 0x34]).to_string(),
            "0013A200408B1234"
        );
    }

    #[test]
    fn test_device_role() {
        assert_eq!(DeviceRole::from(1), DeviceRole::Router);
        assert_eq!(DeviceRole::from(9).to_string(), "unknown (0x09)");
    }
}
