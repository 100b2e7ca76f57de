//! Error types

use core::fmt;

/// Failures of the external telemetry link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// No device to connect to
    #[error("no serial port available")]
    NoDevice,

    /// The transport refused to open
    #[error("failed to open {port}: {reason}")]
    Open { port: String, reason: String },

    /// A read returned an error other than a timeout
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    /// Releasing the transport failed
    #[error("failed to close transport: {0}")]
    Close(String),

    /// The reader thread could not be started
    #[error("failed to start telemetry reader: {0}")]
    Spawn(String),
}

impl LinkError {
    /// Whether a later connect attempt can reasonably succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            LinkError::NoDevice => true,
            LinkError::Open { .. } => true,
            LinkError::Read(_) => true,
            LinkError::Close(_) => true,
            LinkError::Spawn(_) => false,
        }
    }

    pub fn open_failed(port: impl fmt::Display, reason: impl fmt::Display) -> Self {
        LinkError::Open {
            port: port.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of the windowed host.
#[derive(Debug, thiserror::Error)]
pub enum DialError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("framebuffer error: {0}")]
    Pixels(#[from] pixels::Error),
}
