//! Serial-attached coordinator radio.

use crossbeam_channel::{Receiver, Sender};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use sgf_frame::{
    ApiFrameCodec, AtCommand, Destination, FrameIdSequence, FrameReader, FrameResult,
    InboundFrame, TransmitRequest,
};
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, trace};

use super::RadioTransport;
use crate::error::{ControllerError, ControllerResult};

/// Read timeout; bounds how long a halt waits for the reader thread.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Coordinator radio on a serial port, in API mode without escaping.
///
/// Writes happen on the caller's thread. A background thread reads the port,
/// splits the byte stream into frames and sends them on the channel returned
/// by [`SerialRadio::open`].
pub struct SerialRadio {
    port: Box<dyn SerialPort>,
    frame_ids: FrameIdSequence,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl SerialRadio {
    /// Open a serial port and start reading frames from it.
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0")
    /// * `baud_rate` - Baud rate (e.g., 9600)
    pub fn open(
        path: &str,
        baud_rate: u32,
    ) -> ControllerResult<(Self, Receiver<FrameResult<InboundFrame>>)> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()?;
        info!("Opened serial port: {} at {} baud", path, baud_rate);

        let reader_port = port.try_clone()?;
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::unbounded();

        let reader = {
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("sgf-radio-rx".to_string())
                .spawn(move || read_loop(reader_port, tx, stop))?
        };

        Ok((
            SerialRadio {
                port,
                frame_ids: FrameIdSequence::new(),
                stop,
                reader: Some(reader),
            },
            rx,
        ))
    }

    fn write_frame(&mut self, frame_data: &[u8]) -> ControllerResult<()> {
        let frame = ApiFrameCodec::encode(frame_data);
        trace!("radio tx {}", hex::encode_upper(&frame));
        self.port.write_all(&frame)?;
        self.port.flush()?;
        Ok(())
    }
}

impl RadioTransport for SerialRadio {
    fn transmit(&mut self, destination: &Destination, payload: &[u8]) -> ControllerResult<()> {
        let request = TransmitRequest {
            frame_id: self.frame_ids.next_id(),
            destination: *destination,
            payload: payload.to_vec(),
        };
        self.write_frame(&request.encode())
    }

    fn send_at(&mut self, command: [u8; 2], parameter: &[u8]) -> ControllerResult<()> {
        let request = AtCommand {
            frame_id: self.frame_ids.next_id(),
            command,
            parameter: parameter.to_vec(),
        };
        self.write_frame(&request.encode())
    }

    fn halt(&mut self) -> ControllerResult<()> {
        let Some(reader) = self.reader.take() else {
            return Ok(());
        };
        self.stop.store(true, Ordering::Relaxed);
        reader.join().map_err(|_| ControllerError::ReaderPanicked)?;
        info!("Radio halted");
        Ok(())
    }
}

impl Drop for SerialRadio {
    fn drop(&mut self) {
        if let Err(e) = self.halt() {
            error!("failed to halt radio: {}", e);
        }
    }
}

fn read_loop(
    mut port: Box<dyn SerialPort>,
    frames: Sender<FrameResult<InboundFrame>>,
    stop: Arc<AtomicBool>,
) {
    let mut reader = FrameReader::new();
    let mut buf = [0u8; 256];

    while !stop.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => continue,
            Ok(n) => {
                trace!("radio rx {}", hex::encode_upper(&buf[..n]));
                reader.feed(&buf[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) => {
                error!("radio read failed: {}", e);
                break;
            }
        }

        while let Some(frame) = reader.next_frame() {
            if frames.send(frame).is_err() {
                debug!("frame receiver dropped, stopping radio reader");
                return;
            }
        }
    }
    debug!("radio reader stopped");
}
