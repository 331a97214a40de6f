//! Operator-facing reports produced while handling inbound frames.

use sgf_frame::ShortAddress;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::DispatchError;

/// Data-frame sub-commands, keyed by the two-character payload code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// `ID`: identification reply.
    Identification,
    /// `ST`: status reply.
    Status,
    /// `NK`: negative acknowledgement.
    Nak,
    /// `ER`: error notification.
    Error,
    /// `CF`: configuration reply.
    Config,
}

impl ReplyKind {
    /// Look up a sub-command from its payload code.
    pub fn from_code(code: &str) -> Option<ReplyKind> {
        match code {
            "ID" => Some(ReplyKind::Identification),
            "ST" => Some(ReplyKind::Status),
            "NK" => Some(ReplyKind::Nak),
            "ER" => Some(ReplyKind::Error),
            "CF" => Some(ReplyKind::Config),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ReplyKind::Identification => "ID",
            ReplyKind::Status => "Status",
            ReplyKind::Nak => "NAK received",
            ReplyKind::Error => "Error",
            ReplyKind::Config => "CF",
        }
    }
}

/// The visible outcome of one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// A node was seen for the first time.
    NodeJoined {
        /// Node id.
        node_id: String,
        /// Network address.
        address: ShortAddress,
    },
    /// A known address now reports a different node id.
    NodeRenamed {
        /// Node id before the change.
        previous: String,
        /// Current node id.
        node_id: String,
        /// Network address.
        address: ShortAddress,
    },
    /// A known node rejoined under a new address.
    NodeReaddressed {
        /// Node id.
        node_id: String,
        /// Former network address.
        previous: ShortAddress,
        /// Current network address.
        address: ShortAddress,
    },
    /// A node re-announced itself with nothing new.
    NodeUnchanged {
        /// Node id.
        node_id: String,
        /// Network address.
        address: ShortAddress,
    },
    /// A node answered with a known sub-command.
    Reply {
        /// Sub-command.
        kind: ReplyKind,
        /// Display name of the sender.
        node_id: String,
        /// Payload fields after the code.
        args: Vec<String>,
    },
    /// An IO sample arrived; samples are not processed.
    SampleIgnored {
        /// Network address of the sender.
        address: ShortAddress,
    },
    /// The coordinator rejected an AT command.
    AtCommandFailed {
        /// AT command name.
        command: String,
        /// Status byte.
        status: u8,
    },
    /// The coordinator finished a node discovery run.
    DiscoveryComplete,
    /// An AT response with no handler.
    UnhandledAtResponse {
        /// AT command name.
        command: String,
    },
    /// A transmission needed retries or was not delivered.
    DeliveryWarning {
        /// Display name of the destination.
        node_id: String,
        /// Application retries.
        retries: u8,
        /// Delivery status.
        deliver_status: u8,
    },
    /// A transmission was delivered first time.
    Delivered {
        /// Display name of the destination.
        node_id: String,
    },
    /// The frame was dropped.
    Dropped(DispatchError),
}

impl Report {
    /// Emit this report through `tracing` at a level matching its severity.
    pub fn log(&self) {
        match self {
            Report::NodeJoined { .. }
            | Report::NodeRenamed { .. }
            | Report::NodeReaddressed { .. }
            | Report::Reply { .. } => info!("{}", self),
            Report::NodeUnchanged { .. }
            | Report::SampleIgnored { .. }
            | Report::DiscoveryComplete
            | Report::Delivered { .. } => debug!("{}", self),
            Report::AtCommandFailed { .. }
            | Report::UnhandledAtResponse { .. }
            | Report::DeliveryWarning { .. }
            | Report::Dropped(_) => warn!("{}", self),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::NodeJoined { node_id, address } => {
                write!(f, "Node ID: {} Source Addr: {} (new)", node_id, address)
            }
            Report::NodeRenamed {
                previous,
                node_id,
                address,
            } => write!(f, "Node ID: {} Source Addr: {} (was {})", node_id, address, previous),
            Report::NodeReaddressed {
                node_id,
                previous,
                address,
            } => write!(f, "Node ID: {} Source Addr: {} (moved from {})", node_id, address, previous),
            Report::NodeUnchanged { node_id, address } => {
                write!(f, "Node ID: {} Source Addr: {}", node_id, address)
            }
            Report::Reply { kind, node_id, args } => {
                if args.is_empty() {
                    write!(f, "{}: {}", node_id, kind.label())
                } else {
                    write!(f, "{}: {}: {}", node_id, kind.label(), args.join(":"))
                }
            }
            Report::SampleIgnored { address } => write!(f, "IO sample from {} ignored", address),
            Report::AtCommandFailed { command, status } => {
                write!(f, "AT command {} failed with status {}", command, status)
            }
            Report::DiscoveryComplete => write!(f, "Node discovery complete"),
            Report::UnhandledAtResponse { command } => write!(f, "Unknown AT command {}", command),
            Report::DeliveryWarning {
                node_id,
                retries,
                deliver_status,
            } => write!(
                f,
                "TX Status {}: Retries={}, Deliver Status=0x{:02X}",
                node_id, retries, deliver_status
            ),
            Report::Delivered { node_id } => write!(f, "TX Status {}: delivered", node_id),
            Report::Dropped(error) => write!(f, "{}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_kind_codes() {
        for (code, kind) in [
            ("ID", ReplyKind::Identification),
            ("ST", ReplyKind::Status),
            ("NK", ReplyKind::Nak),
            ("ER", ReplyKind::Error),
            ("CF", ReplyKind::Config),
        ] {
            assert_eq!(ReplyKind::from_code(code), Some(kind));
        }
        assert_eq!(ReplyKind::from_code("st"), None);
        assert_eq!(ReplyKind::from_code("XX"), None);
    }

    #[test]
    fn test_reply_display() {
        let report = Report::Reply {
            kind: ReplyKind::Status,
            node_id: "SGFA12345678".to_string(),
            args: vec!["23".to_string(), "45".to_string()],
        };
        assert_eq!(report.to_string(), "SGFA12345678: Status: 23:45");

        let report = Report::Reply {
            kind: ReplyKind::Nak,
            node_id: "UNKNOWN".to_string(),
            args: Vec::new(),
        };
        assert_eq!(report.to_string(), "UNKNOWN: NAK received");
    }

    #[test]
    fn test_dropped_display() {
        let report = Report::Dropped(DispatchError::UnrecognizedCode {
            code: "XX".to_string(),
            node_id: "SGFA12345678".to_string(),
        });
        assert_eq!(report.to_string(), "SGFA12345678: unknown packet type \"XX\"");
    }
}
