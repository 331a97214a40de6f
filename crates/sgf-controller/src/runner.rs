//! The controller run loop.
//!
//! Three producers feed the session, each on its own channel:
//!
//! - the radio reader thread (inbound frames)
//! - the console thread (operator command lines)
//! - the interrupt handler (Ctrl-C)
//!
//! The session itself only ever runs on the thread calling [`run`].

use crossbeam_channel::{never, select, Receiver};
use sgf_frame::{FrameResult, InboundFrame};
use std::io::{self, BufRead};
use std::thread;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::scheduler::Pacer;
use crate::session::{Flow, Session};
use crate::transport::RadioTransport;

/// Read operator command lines from stdin on a background thread.
///
/// The channel disconnects when stdin reaches end of file.
pub fn spawn_console_reader() -> ControllerResult<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::Builder::new()
        .name("sgf-console".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("failed to read console: {}", e);
                        break;
                    }
                }
            }
            debug!("console reader stopped");
        })?;
    Ok(rx)
}

/// Route Ctrl-C to a channel.
///
/// Can be installed once per process.
pub fn install_interrupt_handler() -> ControllerResult<Receiver<()>> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        // A pending interrupt is enough; extra presses are dropped.
        let _ = tx.try_send(());
    })?;
    Ok(rx)
}

/// Run the controller until the operator quits, an interrupt arrives or the
/// radio fails.
///
/// The session is always shut down before returning, whatever the outcome.
pub fn run<T: RadioTransport, P: Pacer>(
    session: &mut Session<T, P>,
    frames: Receiver<FrameResult<InboundFrame>>,
    commands: Receiver<String>,
    interrupts: Receiver<()>,
    config: &ControllerConfig,
) -> ControllerResult<()> {
    let result = event_loop(session, &frames, &commands, &interrupts, config);
    let halted = session.shutdown();

    match session.registry().to_json() {
        Ok(json) => debug!(nodes = session.registry().len(), "final registry: {}", json),
        Err(e) => warn!("failed to serialize registry: {}", e),
    }

    result.and(halted)
}

fn event_loop<T: RadioTransport, P: Pacer>(
    session: &mut Session<T, P>,
    frames: &Receiver<FrameResult<InboundFrame>>,
    commands: &Receiver<String>,
    interrupts: &Receiver<()>,
    config: &ControllerConfig,
) -> ControllerResult<()> {
    if config.discover_on_start {
        thread::sleep(config.settle_delay());
        session.discover()?;
    }

    let mut console_open = true;
    loop {
        // Stop polling the console once it has closed; frames keep flowing.
        let console = if console_open {
            commands.clone()
        } else {
            never()
        };

        select! {
            recv(frames) -> frame => match frame {
                Ok(frame) => {
                    session.receive(frame)?;
                }
                Err(_) => return Err(ControllerError::ChannelClosed("radio")),
            },
            recv(console) -> line => match line {
                Ok(line) => {
                    if session.execute(&line)? == Flow::Terminate {
                        return Ok(());
                    }
                }
                Err(_) => {
                    info!("Console closed");
                    console_open = false;
                }
            },
            recv(interrupts) -> _ => {
                info!("Interrupted");
                return Ok(());
            }
        }
    }
}
