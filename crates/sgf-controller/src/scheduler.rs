//! Outbound request scheduling.
//!
//! Requests to more than one node are paced: the scheduler waits one pacing
//! interval between consecutive transmissions so the mesh is not flooded.
//! A request to a single node goes out immediately.

use sgf_console::Request;
use sgf_frame::Destination;
use std::thread;
use std::time::Duration;
use tracing::info;

use crate::error::ControllerResult;
use crate::registry::{Node, Registry};
use crate::router::FollowUp;
use crate::transport::RadioTransport;

// ============================================================================
// Pacing
// ============================================================================

/// Waits between paced transmissions.
pub trait Pacer {
    /// Block for `interval`.
    fn pause(&mut self, interval: Duration);
}

/// Pacer that sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, interval: Duration) {
        thread::sleep(interval);
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Sends requests to registered nodes.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pacing: Duration,
}

impl Scheduler {
    /// Create a scheduler with the given pacing interval.
    pub fn new(pacing: Duration) -> Self {
        Scheduler { pacing }
    }

    /// The pacing interval.
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Send `request` to every registered node, in registry order.
    ///
    /// Returns the number of nodes the request was sent to. An empty
    /// registry sends nothing.
    pub fn broadcast<T: RadioTransport, P: Pacer>(
        &self,
        registry: &Registry,
        request: &Request,
        transport: &mut T,
        pacer: &mut P,
    ) -> ControllerResult<usize> {
        self.send_to(registry.iter(), request, transport, pacer)
    }

    /// Send `request` to every node whose id contains `pattern`.
    pub fn request_matching<T: RadioTransport, P: Pacer>(
        &self,
        registry: &Registry,
        pattern: &str,
        request: &Request,
        transport: &mut T,
        pacer: &mut P,
    ) -> ControllerResult<usize> {
        self.send_to(registry.find_by_node_id_substring(pattern), request, transport, pacer)
    }

    /// Send `request` to each of `targets`, pausing between sends.
    pub fn send_to<'a, T, P>(
        &self,
        targets: impl IntoIterator<Item = &'a Node>,
        request: &Request,
        transport: &mut T,
        pacer: &mut P,
    ) -> ControllerResult<usize>
    where
        T: RadioTransport,
        P: Pacer,
    {
        let payload = request.to_payload();
        let mut sent = 0;
        for node in targets {
            if sent > 0 {
                pacer.pause(self.pacing);
            }
            transmit(transport, &node.node_id, &node.destination(), &payload)?;
            sent += 1;
        }
        Ok(sent)
    }

    /// Send a request the router asked for. Never paced.
    pub fn send_follow_up<T: RadioTransport>(
        &self,
        follow_up: &FollowUp,
        transport: &mut T,
    ) -> ControllerResult<()> {
        transmit(
            transport,
            &follow_up.node_id,
            &follow_up.destination,
            &follow_up.request.to_payload(),
        )
    }
}

fn transmit<T: RadioTransport>(
    transport: &mut T,
    node_id: &str,
    destination: &Destination,
    payload: &str,
) -> ControllerResult<()> {
    info!("Sending {} to {}", payload, node_id);
    transport.transmit(destination, payload.as_bytes())
}
