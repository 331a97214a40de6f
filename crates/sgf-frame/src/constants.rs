//! Protocol constants
//!
//! API identifiers and well-known values for XBee ZigBee radios running in
//! API mode (AP=1).

// ============================================================================
// Framing
// ============================================================================

/// Start delimiter of every API frame.
pub const START_DELIMITER: u8 = 0x7E;
/// Largest frame data length accepted from the radio.
pub const MAX_FRAME_DATA: usize = 256;

// ============================================================================
// API Identifiers (host → radio)
// ============================================================================

/// Local AT command.
pub const API_AT_COMMAND: u8 = 0x08;
/// ZigBee transmit request.
pub const API_TX_REQUEST: u8 = 0x10;

// ============================================================================
// API Identifiers (radio → host)
// ============================================================================

/// Response to a local AT command.
pub const API_AT_RESPONSE: u8 = 0x88;
/// ZigBee transmit status.
pub const API_TX_STATUS: u8 = 0x8B;
/// ZigBee receive packet.
pub const API_RX_PACKET: u8 = 0x90;
/// ZigBee IO data sample.
pub const API_RX_IO_SAMPLE: u8 = 0x92;
/// Node identification indicator, broadcast when a node joins or its
/// commissioning button is pressed.
pub const API_NODE_ID_INDICATOR: u8 = 0x95;

// ============================================================================
// AT Commands
// ============================================================================

/// Node discovery.
pub const AT_NODE_DISCOVER: [u8; 2] = *b"ND";
/// AT command completed successfully.
pub const AT_STATUS_OK: u8 = 0x00;

// ============================================================================
// Transmit Status
// ============================================================================

/// Delivery status reported for a successful transmission.
pub const DELIVERY_SUCCESS: u8 = 0x00;

// ============================================================================
// Device Types
// ============================================================================

/// Network coordinator.
pub const DEVICE_TYPE_COORDINATOR: u8 = 0;
/// Router.
pub const DEVICE_TYPE_ROUTER: u8 = 1;
/// End device.
pub const DEVICE_TYPE_END_DEVICE: u8 = 2;
