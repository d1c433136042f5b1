//! Unified adapter error types.

use thiserror::Error;

/// Why a decoded frame could not be mapped to an event variant.
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("frame has no \"e\" discriminator field")]
    MissingDiscriminator,

    #[error("\"e\" discriminator is not a string (found {found})")]
    NonStringDiscriminator { found: &'static str },

    #[error("unknown event type \"{0}\"")]
    UnknownEventType(String),
}

/// A recognized frame whose payload does not have the shape its event
/// type requires. Carries the discriminator and, where one specific
/// field is at fault, the wire key of that field.
#[derive(Error, Debug)]
pub enum MalformedEventError {
    #[error("{event}: payload does not match the expected shape: {source}")]
    Shape {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{event}: invalid field \"{field}\": {reason}")]
    InvalidField {
        event: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl MalformedEventError {
    /// The discriminator of the event the frame claimed to be.
    pub fn event(&self) -> &'static str {
        match self {
            Self::Shape { event, .. } => event,
            Self::InvalidField { event, .. } => event,
        }
    }
}

/// Failure signaled by an application handler while processing an
/// otherwise valid event. Absorbed at the dispatch boundary.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Everything that can go wrong with a single frame. The dispatcher
/// logs these and drops the frame; none of them reach the transport.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("frame is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    MalformedEvent(#[from] MalformedEventError),

    #[error("{event} handler failed: {source}")]
    Handler {
        event: &'static str,
        #[source]
        source: HandlerError,
    },
}

/// Transport-layer errors (native WebSocket client).
#[derive(Error, Debug)]
pub enum WsError {
    #[error("not connected")]
    NotConnected,

    #[error("already connected")]
    AlreadyConnected,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection closed: code={code:?} reason={reason}")]
    Closed { code: Option<u16>, reason: String },
}
