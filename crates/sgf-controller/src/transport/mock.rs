//! Mock radio for testing

use sgf_frame::Destination;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::RadioTransport;
use crate::error::ControllerResult;
use crate::scheduler::Pacer;

/// Something the controller did to the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioEvent {
    /// A payload was transmitted to a node.
    Transmit {
        /// Target node.
        destination: Destination,
        /// Payload bytes.
        payload: Vec<u8>,
    },
    /// A local AT command was issued.
    AtCommand {
        /// Command name.
        command: [u8; 2],
        /// Parameter bytes.
        parameter: Vec<u8>,
    },
    /// A pacer attached to this radio paused.
    Pause(Duration),
    /// The radio was halted.
    Halt,
}

/// Mock radio that records every call in order.
///
/// Clones share the same event log, as does the [`MockPacer`] returned by
/// [`MockRadio::pacer`], so pauses show up between the sends they separate.
#[derive(Debug, Clone, Default)]
pub struct MockRadio {
    inner: Arc<Mutex<MockRadioInner>>,
}

#[derive(Debug, Default)]
struct MockRadioInner {
    events: Vec<RadioEvent>,
    halted: bool,
    failing: bool,
}

impl MockRadio {
    /// Create a new mock radio
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockRadioInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A pacer that records its pauses in this radio's event log.
    pub fn pacer(&self) -> MockPacer {
        MockPacer {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Make every later transmit fail with an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// All recorded events
    pub fn events(&self) -> Vec<RadioEvent> {
        self.lock().events.clone()
    }

    /// Transmitted (destination, payload) pairs, in order.
    pub fn transmitted(&self) -> Vec<(Destination, Vec<u8>)> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                RadioEvent::Transmit {
                    destination,
                    payload,
                } => Some((*destination, payload.clone())),
                _ => None,
            })
            .collect()
    }

    /// Issued AT command names, in order.
    pub fn at_commands(&self) -> Vec<[u8; 2]> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                RadioEvent::AtCommand { command, .. } => Some(*command),
                _ => None,
            })
            .collect()
    }

    /// Whether the radio has been halted.
    pub fn is_halted(&self) -> bool {
        self.lock().halted
    }

    /// Clear recorded events
    pub fn clear(&self) {
        self.lock().events.clear();
    }
}

impl RadioTransport for MockRadio {
    fn transmit(&mut self, destination: &Destination, payload: &[u8]) -> ControllerResult<()> {
        let mut inner = self.lock();
        if inner.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock radio failure").into());
        }
        inner.events.push(RadioEvent::Transmit {
            destination: *destination,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn send_at(&mut self, command: [u8; 2], parameter: &[u8]) -> ControllerResult<()> {
        self.lock().events.push(RadioEvent::AtCommand {
            command,
            parameter: parameter.to_vec(),
        });
        Ok(())
    }

    fn halt(&mut self) -> ControllerResult<()> {
        let mut inner = self.lock();
        if !inner.halted {
            inner.halted = true;
            inner.events.push(RadioEvent::Halt);
        }
        Ok(())
    }
}

/// Pacer that records pauses instead of sleeping.
#[derive(Debug, Clone)]
pub struct MockPacer {
    inner: Arc<Mutex<MockRadioInner>>,
}

impl Pacer for MockPacer {
    fn pause(&mut self, interval: Duration) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .push(RadioEvent::Pause(interval));
    }
}
