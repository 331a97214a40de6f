//! Two-level dispatch of inbound frames.
//!
//! The first level matches on the frame kind. Data frames go through a second
//! level keyed by the two-character code at the start of the payload. Both
//! levels are closed: anything unrecognised becomes a [`Report::Dropped`]
//! and leaves the registry untouched.
//!
//! Routing never transmits anything itself. When a frame calls for a request
//! to a node the [`Dispatch`] carries it as a [`FollowUp`] for the caller to
//! send.

use sgf_console::{Request, FIELD_DELIMITER};
use sgf_frame::{
    Destination, InboundFrame, NodeDescriptor, ShortAddress, AT_NODE_DISCOVER, AT_STATUS_OK,
    DELIVERY_SUCCESS,
};
use tracing::trace;

use crate::error::DispatchError;
use crate::registry::{Node, Registry, UpsertOutcome};
use crate::report::{ReplyKind, Report};

/// A request the router wants sent as a result of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    /// Node id of the target.
    pub node_id: String,
    /// Target node.
    pub destination: Destination,
    /// Request to send.
    pub request: Request,
}

/// Result of routing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// What happened.
    pub report: Report,
    /// Request to send, if any.
    pub follow_up: Option<FollowUp>,
}

impl From<Report> for Dispatch {
    fn from(report: Report) -> Self {
        Dispatch {
            report,
            follow_up: None,
        }
    }
}

/// Routes inbound frames to their handlers.
#[derive(Debug, Clone, Default)]
pub struct Router {
    requery_on_rename: bool,
}

impl Router {
    /// Create a router.
    ///
    /// With `requery_on_rename` set, a node whose id changed is asked to
    /// identify itself again, just like a newly joined node.
    pub fn new(requery_on_rename: bool) -> Self {
        Router { requery_on_rename }
    }

    /// Route one frame, updating `registry` as needed.
    pub fn route(&self, registry: &mut Registry, frame: InboundFrame) -> Dispatch {
        trace!(kind = ?frame.kind(), "routing frame");
        match frame {
            InboundFrame::NodeIdentification { descriptor, .. } => {
                self.node_identification(registry, &descriptor)
            }
            InboundFrame::Data { source, rf_data, .. } => {
                data_frame(registry, source.unwrap_or(ShortAddress::UNKNOWN), &rf_data).into()
            }
            InboundFrame::Sample { source, .. } => Report::SampleIgnored { address: source }.into(),
            InboundFrame::AtResponse {
                command,
                status,
                parameter,
                ..
            } => self.at_response(registry, command, status, &parameter),
            InboundFrame::TxStatus {
                dest,
                retries,
                deliver_status,
                ..
            } => tx_status(registry, dest, retries, deliver_status).into(),
            InboundFrame::Unrecognized { api_id, .. } => {
                Report::Dropped(DispatchError::UnrecognizedKind(api_id)).into()
            }
        }
    }

    fn node_identification(&self, registry: &mut Registry, data: &[u8]) -> Dispatch {
        let node = match NodeDescriptor::decode(data) {
            Ok(descriptor) => {
                trace!(role = %descriptor.role(), "node descriptor");
                Node::from(descriptor)
            }
            Err(e) => return Report::Dropped(e.into()).into(),
        };

        let node_id = node.node_id.clone();
        let address = node.short_address;
        let destination = node.destination();

        let outcome = registry.upsert(node);
        let identify = outcome.is_new()
            || (self.requery_on_rename && matches!(outcome, UpsertOutcome::Renamed { .. }));

        let report = match outcome {
            UpsertOutcome::Inserted => Report::NodeJoined {
                node_id: node_id.clone(),
                address,
            },
            UpsertOutcome::Renamed { previous } => Report::NodeRenamed {
                previous,
                node_id: node_id.clone(),
                address,
            },
            UpsertOutcome::Readdressed { previous } => Report::NodeReaddressed {
                node_id: node_id.clone(),
                previous,
                address,
            },
            UpsertOutcome::Unchanged => Report::NodeUnchanged {
                node_id: node_id.clone(),
                address,
            },
        };

        Dispatch {
            report,
            follow_up: identify.then(|| FollowUp {
                node_id,
                destination,
                request: Request::Identify,
            }),
        }
    }

    fn at_response(
        &self,
        registry: &mut Registry,
        command: [u8; 2],
        status: u8,
        parameter: &[u8],
    ) -> Dispatch {
        let name = String::from_utf8_lossy(&command).into_owned();
        if status != AT_STATUS_OK {
            return Report::AtCommandFailed {
                command: name,
                status,
            }
            .into();
        }
        if command == AT_NODE_DISCOVER {
            // An empty parameter marks the end of the discovery window.
            if parameter.is_empty() {
                return Report::DiscoveryComplete.into();
            }
            return self.node_identification(registry, parameter);
        }
        Report::UnhandledAtResponse { command: name }.into()
    }
}

fn data_frame(registry: &Registry, source: ShortAddress, rf_data: &[u8]) -> Report {
    let text = String::from_utf8_lossy(rf_data);
    let mut fields = text.split(FIELD_DELIMITER);
    let code = fields.next().unwrap_or_default();
    let node_id = registry.display_name(&source).to_string();

    match ReplyKind::from_code(code) {
        Some(kind) => Report::Reply {
            kind,
            node_id,
            args: fields.map(str::to_string).collect(),
        },
        None => Report::Dropped(DispatchError::UnrecognizedCode {
            code: code.to_string(),
            node_id,
        }),
    }
}

fn tx_status(registry: &Registry, dest: ShortAddress, retries: u8, deliver_status: u8) -> Report {
    let node_id = registry.display_name(&dest).to_string();
    if retries > 0 || deliver_status != DELIVERY_SUCCESS {
        Report::DeliveryWarning {
            node_id,
            retries,
            deliver_status,
        }
    } else {
        Report::Delivered { node_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgf_frame::{FrameError, LongAddress};

    const ADDR: ShortAddress = ShortAddress([0x7D, 0x84]);
    const LONG: LongAddress = LongAddress([0x00, 0x13, 0xA2, 0x00, 0x40, 0x52, 0x2B, 0xAA]);

    fn descriptor(node_id: &str) -> NodeDescriptor {
        NodeDescriptor {
            short_address: ADDR,
            long_address: LONG,
            node_id: node_id.to_string(),
            parent_short_address: ShortAddress([0xFF, 0xFE]),
            device_type: 1,
            source_event: 1,
            profile_id: 0xC105,
            manufacturer_id: 0x101E,
        }
    }

    fn identification(node_id: &str) -> InboundFrame {
        InboundFrame::NodeIdentification {
            sender_long: LONG,
            sender: ADDR,
            options: 0x02,
            descriptor: descriptor(node_id).encode(),
        }
    }

    fn data(rf_data: &[u8]) -> InboundFrame {
        InboundFrame::Data {
            source_long: Some(LONG),
            source: Some(ADDR),
            options: 0x01,
            rf_data: rf_data.to_vec(),
        }
    }

    #[test]
    fn test_new_node_is_registered_and_identified() {
        let router = Router::default();
        let mut registry = Registry::new();

        let dispatch = router.route(&mut registry, identification("SGFA12345678"));
        assert_eq!(
            dispatch.report,
            Report::NodeJoined {
                node_id: "SGFA12345678".to_string(),
                address: ADDR
            }
        );
        let follow_up = dispatch.follow_up.expect("should identify new node");
        assert_eq!(follow_up.request, Request::Identify);
        assert_eq!(follow_up.destination.long_address, LONG);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_repeat_identification_is_quiet() {
        let router = Router::default();
        let mut registry = Registry::new();
        router.route(&mut registry, identification("SGFA12345678"));

        let dispatch = router.route(&mut registry, identification("SGFA12345678"));
        assert!(matches!(dispatch.report, Report::NodeUnchanged { .. }));
        assert!(dispatch.follow_up.is_none());
    }

    #[test]
    fn test_rename_requery_is_optional() {
        let mut registry = Registry::new();
        Router::default().route(&mut registry, identification("SGFA12345678"));

        let dispatch = Router::default().route(&mut registry, identification("SGFW12345678"));
        assert!(matches!(dispatch.report, Report::NodeRenamed { .. }));
        assert!(dispatch.follow_up.is_none());

        let dispatch = Router::new(true).route(&mut registry, identification("SGFM12345678"));
        assert!(dispatch.follow_up.is_some());
        assert_eq!(registry.display_name(&ADDR), "SGFM12345678");
    }

    #[test]
    fn test_truncated_descriptor_is_dropped() {
        let mut registry = Registry::new();
        let frame = InboundFrame::NodeIdentification {
            sender_long: LONG,
            sender: ADDR,
            options: 0,
            descriptor: b"\x7D\x84\x00\x13\xA2\x00\x40\x52\x2B\xAASGFA".to_vec(),
        };

        let dispatch = Router::default().route(&mut registry, frame);
        assert_eq!(
            dispatch.report,
            Report::Dropped(DispatchError::Frame(FrameError::TruncatedFrame {
                field: "node_id",
                offset: 10
            }))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_data_frame_from_registered_node() {
        let router = Router::default();
        let mut registry = Registry::new();
        router.route(&mut registry, identification("SGFA12345678"));

        let dispatch = router.route(&mut registry, data(b"ST:23:45"));
        assert_eq!(
            dispatch.report,
            Report::Reply {
                kind: ReplyKind::Status,
                node_id: "SGFA12345678".to_string(),
                args: vec!["23".to_string(), "45".to_string()],
            }
        );
    }

    #[test]
    fn test_data_frame_without_source_uses_placeholder() {
        let mut registry = Registry::new();
        let frame = InboundFrame::Data {
            source_long: None,
            source: None,
            options: 0,
            rf_data: b"NK".to_vec(),
        };

        let dispatch = Router::default().route(&mut registry, frame);
        assert_eq!(
            dispatch.report,
            Report::Reply {
                kind: ReplyKind::Nak,
                node_id: "UNKNOWN".to_string(),
                args: Vec::new(),
            }
        );
    }

    #[test]
    fn test_unknown_code_leaves_registry_alone() {
        let router = Router::default();
        let mut registry = Registry::new();
        router.route(&mut registry, identification("SGFA12345678"));
        let before = registry.to_json().unwrap();

        for payload in [&b"XX:1"[..], b"", b"\xFF\xFE"] {
            let dispatch = router.route(&mut registry, data(payload));
            assert!(matches!(
                dispatch.report,
                Report::Dropped(DispatchError::UnrecognizedCode { .. })
            ));
            assert!(dispatch.follow_up.is_none());
        }
        assert_eq!(registry.to_json().unwrap(), before);
    }

    #[test]
    fn test_unknown_kind_leaves_registry_alone() {
        let mut registry = Registry::new();
        let frame = InboundFrame::Unrecognized {
            api_id: 0xA1,
            body: vec![1, 2, 3],
        };

        let dispatch = Router::default().route(&mut registry, frame);
        assert_eq!(dispatch.report, Report::Dropped(DispatchError::UnrecognizedKind(0xA1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sample_is_ignored() {
        let mut registry = Registry::new();
        let frame = InboundFrame::Sample {
            source_long: LONG,
            source: ADDR,
            samples: vec![0x01, 0x00, 0x10],
        };
        let dispatch = Router::default().route(&mut registry, frame);
        assert_eq!(dispatch.report, Report::SampleIgnored { address: ADDR });
        assert!(registry.is_empty());
    }

    #[test]
    fn test_node_discovery_response_registers_node() {
        let mut registry = Registry::new();
        let frame = InboundFrame::AtResponse {
            frame_id: 1,
            command: *b"ND",
            status: 0,
            parameter: descriptor("SGFA12345678").encode(),
        };

        let dispatch = Router::default().route(&mut registry, frame);
        assert!(matches!(dispatch.report, Report::NodeJoined { .. }));
        assert!(dispatch.follow_up.is_some());
        assert_eq!(registry.display_name(&ADDR), "SGFA12345678");
    }

    #[test]
    fn test_empty_node_discovery_response_ends_discovery() {
        let mut registry = Registry::new();
        let frame = InboundFrame::AtResponse {
            frame_id: 1,
            command: *b"ND",
            status: 0,
            parameter: Vec::new(),
        };

        let dispatch = Router::default().route(&mut registry, frame);
        assert_eq!(dispatch.report, Report::DiscoveryComplete);
        assert!(dispatch.follow_up.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_other_at_responses() {
        let mut registry = Registry::new();
        let router = Router::default();

        let dispatch = router.route(
            &mut registry,
            InboundFrame::AtResponse {
                frame_id: 1,
                command: *b"NJ",
                status: 0,
                parameter: vec![0xFF],
            },
        );
        assert_eq!(
            dispatch.report,
            Report::UnhandledAtResponse {
                command: "NJ".to_string()
            }
        );

        let dispatch = router.route(
            &mut registry,
            InboundFrame::AtResponse {
                frame_id: 2,
                command: *b"ND",
                status: 1,
                parameter: Vec::new(),
            },
        );
        assert_eq!(
            dispatch.report,
            Report::AtCommandFailed {
                command: "ND".to_string(),
                status: 1
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_tx_status() {
        let router = Router::default();
        let mut registry = Registry::new();
        router.route(&mut registry, identification("SGFA12345678"));

        let status = |retries, deliver_status, dest| InboundFrame::TxStatus {
            frame_id: 1,
            dest,
            retries,
            deliver_status,
            discover_status: 0,
        };

        assert_eq!(
            router.route(&mut registry, status(0, 0, ADDR)).report,
            Report::Delivered {
                node_id: "SGFA12345678".to_string()
            }
        );
        assert_eq!(
            router.route(&mut registry, status(2, 0, ADDR)).report,
            Report::DeliveryWarning {
                node_id: "SGFA12345678".to_string(),
                retries: 2,
                deliver_status: 0
            }
        );
        assert_eq!(
            router.route(&mut registry, status(0, 0x24, ShortAddress([0x01, 0x02]))).report,
            Report::DeliveryWarning {
                node_id: "UNKNOWN".to_string(),
                retries: 0,
                deliver_status: 0x24
            }
        );
    }
}
