//! A controller session: registry, router and scheduler bound to one radio.

use sgf_console::{Command, Request};
use sgf_frame::{FrameResult, InboundFrame, AT_NODE_DISCOVER};
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::ControllerResult;
use crate::registry::Registry;
use crate::report::Report;
use crate::router::Router;
use crate::scheduler::{Pacer, Scheduler};
use crate::transport::RadioTransport;

/// Whether the controller keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going.
    Continue,
    /// The operator asked to stop.
    Terminate,
}

/// Controller state for one radio.
///
/// Frames and command lines are handled one at a time; nothing here is
/// shared across threads.
pub struct Session<T: RadioTransport, P: Pacer> {
    registry: Registry,
    transport: T,
    pacer: P,
    router: Router,
    scheduler: Scheduler,
    halted: bool,
}

impl<T: RadioTransport, P: Pacer> Session<T, P> {
    /// Create a session with an empty registry.
    pub fn new(transport: T, pacer: P, config: &ControllerConfig) -> Self {
        Session {
            registry: Registry::new(),
            transport,
            pacer,
            router: Router::new(config.requery_on_rename),
            scheduler: Scheduler::new(config.pacing()),
            halted: false,
        }
    }

    /// The node registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one decoded inbound frame.
    ///
    /// The report is logged and returned. Any request the frame calls for is
    /// sent before returning; only a failure to send is an error.
    pub fn handle_frame(&mut self, frame: InboundFrame) -> ControllerResult<Report> {
        let dispatch = self.router.route(&mut self.registry, frame);
        dispatch.report.log();
        if let Some(follow_up) = &dispatch.follow_up {
            self.scheduler.send_follow_up(follow_up, &mut self.transport)?;
        }
        Ok(dispatch.report)
    }

    /// Handle a frame as it comes off the radio, decoded or not.
    pub fn receive(&mut self, frame: FrameResult<InboundFrame>) -> ControllerResult<Report> {
        match frame {
            Ok(frame) => self.handle_frame(frame),
            Err(e) => {
                let report = Report::Dropped(e.into());
                report.log();
                Ok(report)
            }
        }
    }

    /// Execute one operator command line.
    ///
    /// Unknown verbs and malformed arguments are reported and ignored.
    pub fn execute(&mut self, line: &str) -> ControllerResult<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.run_command(command),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                warn!("{}", e);
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute a parsed command.
    pub fn run_command(&mut self, command: Command) -> ControllerResult<Flow> {
        debug!("running '{}'", command.verb().as_str());
        match command {
            Command::Shutdown => {
                self.shutdown()?;
                return Ok(Flow::Terminate);
            }
            Command::Broadcast(request) => {
                let sent = self.scheduler.broadcast(
                    &self.registry,
                    &request,
                    &mut self.transport,
                    &mut self.pacer,
                )?;
                if sent == 0 {
                    info!("No nodes registered");
                }
            }
            Command::DiscoverNodes => self.discover()?,
            Command::SetConfig { target, values } => {
                let request = Request::SetConfig(values);
                let sent = self.scheduler.request_matching(
                    &self.registry,
                    &target,
                    &request,
                    &mut self.transport,
                    &mut self.pacer,
                )?;
                if sent == 0 {
                    warn!("No node matches {}", target);
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Ask the coordinator to discover nodes.
    ///
    /// Replies arrive later as `ND` AT responses.
    pub fn discover(&mut self) -> ControllerResult<()> {
        info!("Discovering nodes");
        self.transport.send_at(AT_NODE_DISCOVER, &[])
    }

    /// Halt the radio. Later calls do nothing.
    pub fn shutdown(&mut self) -> ControllerResult<()> {
        if self.halted {
            return Ok(());
        }
        self.halted = true;
        info!("Shutting down");
        self.transport.halt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockPacer, MockRadio, RadioEvent};
    use sgf_frame::{LongAddress, NodeDescriptor, ShortAddress};

    fn session() -> (Session<MockRadio, MockPacer>, MockRadio) {
        let radio = MockRadio::new();
        let pacer = radio.pacer();
        let session = Session::new(radio.clone(), pacer, &ControllerConfig::default());
        (session, radio)
    }

    fn announce(node_id: &str, short: u8) -> InboundFrame {
        let descriptor = NodeDescriptor {
            short_address: ShortAddress([0x30, short]),
            long_address: LongAddress([0, 0x13, 0xA2, 0, 0, 0, 0, short]),
            node_id: node_id.to_string(),
            parent_short_address: ShortAddress([0xFF, 0xFE]),
            device_type: 1,
            source_event: 1,
            profile_id: 0xC105,
            manufacturer_id: 0x101E,
        };
        InboundFrame::NodeIdentification {
            sender_long: descriptor.long_address,
            sender: descriptor.short_address,
            options: 0x02,
            descriptor: descriptor.encode(),
        }
    }

    #[test]
    fn test_new_node_gets_identify_request() {
        let (mut session, radio) = session();
        session.handle_frame(announce("SGFA12345678", 1)).unwrap();

        assert_eq!(session.registry().len(), 1);
        let transmitted = radio.transmitted();
        assert_eq!(transmitted.len(), 1);
        assert_eq!(transmitted[0].0.long_address.0[7], 1);
        assert_eq!(transmitted[0].1, b"ID?");
    }

    #[test]
    fn test_receive_reports_malformed_frame() {
        let (mut session, radio) = session();
        let report = session
            .receive(Err(sgf_frame::FrameError::ChecksumMismatch {
                expected: 0x10,
                actual: 0x11,
            }))
            .unwrap();
        assert!(matches!(report, Report::Dropped(_)));
        assert!(radio.events().is_empty());
    }

    #[test]
    fn test_discover_sends_nd() {
        let (mut session, radio) = session();
        assert_eq!(session.execute("n").unwrap(), Flow::Continue);
        assert_eq!(radio.at_commands(), [*b"ND"]);
    }

    #[test]
    fn test_set_config_usage_error_is_not_fatal() {
        let (mut session, radio) = session();
        session.handle_frame(announce("SGFA12345678", 1)).unwrap();
        radio.clear();

        assert_eq!(session.execute("k").unwrap(), Flow::Continue);
        assert!(radio.events().is_empty());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (mut session, radio) = session();
        assert_eq!(session.execute("Q").unwrap(), Flow::Terminate);
        session.shutdown().unwrap();

        assert!(radio.is_halted());
        assert_eq!(radio.events(), [RadioEvent::Halt]);
    }

    #[test]
    fn test_transport_failure_propagates() {
        let (mut session, radio) = session();
        session.handle_frame(announce("SGFA12345678", 1)).unwrap();
        radio.set_failing(true);

        assert!(session.execute("s").is_err());
    }
}
