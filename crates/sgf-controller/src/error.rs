//! Error types for the controller.

use sgf_frame::FrameError;
use thiserror::Error;

/// Why an inbound frame produced no effect.
///
/// Always recoverable: the frame is reported and dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The frame, or a record embedded in it, could not be decoded.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// No handler for this frame kind.
    #[error("unknown top level frame type 0x{0:02X}")]
    UnrecognizedKind(u8),

    /// No handler for this data-frame code.
    #[error("{node_id}: unknown packet type {code:?}")]
    UnrecognizedCode {
        /// Code from the first payload field.
        code: String,
        /// Display name of the sender.
        node_id: String,
    },
}

/// Errors that end the controller run loop.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Opening or configuring the serial port failed.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Reading from or writing to the radio failed.
    #[error("radio I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A producer thread went away.
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),

    /// The radio reader thread panicked.
    #[error("radio reader thread panicked")]
    ReaderPanicked,

    /// Installing the interrupt handler failed.
    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Result type alias for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;
