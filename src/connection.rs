//! Lifetime of the external telemetry link.
//!
//! The manager opens a transport, hands it to a single reader thread and
//! collects what the thread produces over a channel. The owning event loop
//! calls [`ConnectionManager::poll`] once per frame, so records are applied on
//! the UI side in the order they were written by the device.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::config::LinkSettings;
use crate::error::LinkError;
use crate::telemetry::{TelemetryLineParser, TelemetryRecord};

const READ_BUFFER_SIZE: usize = 1024;

/// A readable byte stream from the device.
///
/// `read_chunk` must return within a bounded time: `Ok(0)` for end of stream,
/// or an error of kind `TimedOut`/`WouldBlock` when nothing arrived, so the
/// reader can notice cancellation.
pub trait Transport: Send {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn close(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

/// Opens transports. Stands in for the device chooser.
pub trait Connector {
    type Port: Transport + 'static;

    fn open(&mut self, settings: &LinkSettings) -> Result<Self::Port, LinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Torn down, but cancelling or closing reported a problem.
    DisconnectedWithErrors,
    Connected,
    Error(String),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(
            self,
            ConnectionState::Disconnected | ConnectionState::DisconnectedWithErrors
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("Disconnected"),
            ConnectionState::DisconnectedWithErrors => f.write_str("Disconnected (with errors)"),
            ConnectionState::Connected => f.write_str("Connected"),
            ConnectionState::Error(message) => write!(f, "Error: {message}"),
        }
    }
}

#[derive(Debug)]
enum LinkEvent {
    Record(TelemetryRecord),
    Failed(String),
    EndOfStream,
}

struct ReaderHandle {
    cancel: Arc<AtomicBool>,
    events: Receiver<LinkEvent>,
    thread: JoinHandle<Result<(), LinkError>>,
}

pub struct ConnectionManager<C: Connector> {
    connector: C,
    settings: LinkSettings,
    state: ConnectionState,
    reader: Option<ReaderHandle>,
    last_raw: TelemetryRecord,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, settings: LinkSettings) -> Self {
        Self {
            connector,
            settings,
            state: ConnectionState::Disconnected,
            reader: None,
            last_raw: TelemetryRecord::default(),
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Human-readable status line.
    pub fn status(&self) -> String {
        self.state.to_string()
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// True while a transport is held, including after a read failure.
    pub fn has_session(&self) -> bool {
        self.reader.is_some()
    }

    /// Last raw sample received in this session.
    pub fn last_raw(&self) -> TelemetryRecord {
        self.last_raw
    }

    /// Opens the transport and starts the reader. A second call while a
    /// session is open does nothing.
    pub fn connect(&mut self) -> Result<(), LinkError> {
        if self.reader.is_some() {
            warn!("connect requested while a telemetry session is open");
            return Ok(());
        }

        let port = match self.connector.open(&self.settings) {
            Ok(port) => port,
            Err(e) => {
                error!(error = %e, "connection failed");
                self.state = ConnectionState::Error(e.to_string());
                return Err(e);
            }
        };

        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, events) = mpsc::channel();
        let max_line_len = self.settings.max_line_len;
        let thread_cancel = Arc::clone(&cancel);

        let spawned = thread::Builder::new()
            .name("ringdial-reader".to_string())
            .spawn(move || read_loop(port, max_line_len, &thread_cancel, &tx));

        match spawned {
            Ok(thread) => {
                self.reader = Some(ReaderHandle {
                    cancel,
                    events,
                    thread,
                });
                self.state = ConnectionState::Connected;
                info!(baud = self.settings.baud_rate, "connected");
                Ok(())
            }
            Err(e) => {
                let e = LinkError::Spawn(e.to_string());
                error!(error = %e, "connection failed");
                self.state = ConnectionState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Stops the reader, releases the transport and zeroes the raw mirror.
    /// Never fails; teardown problems are reported through the state.
    pub fn disconnect(&mut self) {
        let clean = match self.reader.take() {
            Some(reader) => shutdown(reader),
            None => true,
        };

        self.last_raw = TelemetryRecord::default();
        self.state = if clean {
            ConnectionState::Disconnected
        } else {
            ConnectionState::DisconnectedWithErrors
        };
        info!(status = %self.state, "disconnected");
    }

    /// Drains everything the reader produced since the last call.
    pub fn poll(&mut self) -> Vec<TelemetryRecord> {
        let mut records = Vec::new();
        let mut ended = false;

        if let Some(reader) = &self.reader {
            loop {
                match reader.events.try_recv() {
                    Ok(LinkEvent::Record(record)) => {
                        self.last_raw = record;
                        records.push(record);
                    }
                    Ok(LinkEvent::Failed(message)) => {
                        self.state = ConnectionState::Error(message);
                    }
                    Ok(LinkEvent::EndOfStream) => {
                        ended = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if self.state.is_connected() && !ended {
                            self.state =
                                ConnectionState::Error("telemetry reader stopped".to_string());
                        }
                        break;
                    }
                }
            }
        }

        if ended {
            info!("device closed the stream");
            let clean = self.reader.take().map_or(true, shutdown);
            self.state = if clean {
                ConnectionState::Disconnected
            } else {
                ConnectionState::DisconnectedWithErrors
            };
        }

        records
    }
}

impl<C: Connector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            shutdown(reader);
        }
    }
}

/// Cancels and joins the reader. Returns false if teardown hit an error.
fn shutdown(reader: ReaderHandle) -> bool {
    reader.cancel.store(true, Ordering::Release);
    drop(reader.events);

    match reader.thread.join() {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "error while closing transport");
            false
        }
        Err(_) => {
            warn!("telemetry reader panicked");
            false
        }
    }
}

fn read_loop<T: Transport>(
    mut port: T,
    max_line_len: usize,
    cancel: &AtomicBool,
    tx: &Sender<LinkEvent>,
) -> Result<(), LinkError> {
    let mut parser = TelemetryLineParser::new(max_line_len);
    let mut buf = [0u8; READ_BUFFER_SIZE];

    'read: while !cancel.load(Ordering::Acquire) {
        match port.read_chunk(&mut buf) {
            Ok(0) => {
                let _ = tx.send(LinkEvent::EndOfStream);
                break;
            }
            Ok(n) => {
                for record in parser.push(&buf[..n]) {
                    if cancel.load(Ordering::Acquire) || tx.send(LinkEvent::Record(record)).is_err() {
                        break 'read;
                    }
                }
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) => {}
            Err(e) => {
                let e = LinkError::from(e);
                error!(error = %e, "telemetry read failed");
                let _ = tx.send(LinkEvent::Failed(e.to_string()));
                break;
            }
        }
    }

    debug!("telemetry reader exiting");
    port.close()
}
