use std::fmt;

use quickprint_core::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    EncodeProgress {
        session: SessionId,
        percent: u8,
    },
    /// Terminal event of a session; emitted exactly once.
    EncodeCompleted {
        session: SessionId,
        result: Result<EncodedPayload, EncodeError>,
    },
}

/// Base64 text of a whole file.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub data: String,
    pub binary_bytes: u64,
}

impl EncodedPayload {
    pub fn encoded_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("data", &quickprint_logging::payload_summary(&self.data))
            .field("binary_bytes", &self.binary_bytes)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to open {path}: {message}")]
    Open { path: String, message: String },
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("encoding engine is not running")]
    EngineStopped,
}
