use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use quickprint_core::{estimate_encoded_size, SessionId};
use quickprint_logging::{qp_debug, qp_info};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{EncodeError, EncodedPayload, EngineEvent};

/// Largest multiple of 3 not above 64 KiB, so only the last chunk can carry
/// Base64 padding.
pub const DEFAULT_CHUNK_SIZE: usize = 65_535;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub chunk_size: usize,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl EncodeSettings {
    /// Chunk size rounded down to a multiple of 3, at least 3.
    pub fn aligned_chunk_size(&self) -> usize {
        (self.chunk_size / 3).max(1) * 3
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait PayloadEncoder: Send + Sync {
    async fn encode(
        &self,
        session: SessionId,
        path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<EncodedPayload, EncodeError>;
}

/// Reads a file chunk by chunk, yielding to the runtime between chunks.
#[derive(Debug, Clone, Default)]
pub struct ChunkedBase64Encoder {
    settings: EncodeSettings,
}

impl ChunkedBase64Encoder {
    pub fn new(settings: EncodeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl PayloadEncoder for ChunkedBase64Encoder {
    async fn encode(
        &self,
        session: SessionId,
        path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<EncodedPayload, EncodeError> {
        let display = path.display().to_string();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| EncodeError::Open {
                path: display.clone(),
                message: err.to_string(),
            })?;
        let total_len = file
            .metadata()
            .await
            .map_err(|err| EncodeError::Open {
                path: display.clone(),
                message: err.to_string(),
            })?
            .len();

        qp_info!(
            "Encoding session {} path={} bytes={}",
            session,
            display,
            total_len
        );
        encode_reader(session, file, total_len, self.settings, sink)
            .await
            .map_err(|err| EncodeError::Read {
                path: display,
                message: err.to_string(),
            })
    }
}

/// Encodes everything `reader` yields, emitting one progress event per chunk.
///
/// `total_len` is the expected input size and only drives the percentages;
/// the payload always covers the full stream.
pub async fn encode_reader<R>(
    session: SessionId,
    mut reader: R,
    total_len: u64,
    settings: EncodeSettings,
    sink: &dyn ProgressSink,
) -> io::Result<EncodedPayload>
where
    R: AsyncRead + Unpin + Send,
{
    let chunk_size = settings.aligned_chunk_size();
    let total_chunks = total_len.div_ceil(chunk_size as u64);
    let capacity = usize::try_from(estimate_encoded_size(total_len)).unwrap_or(0);

    let mut data = String::with_capacity(capacity);
    let mut buffer = vec![0u8; chunk_size];
    let mut binary_bytes = 0u64;
    let mut processed = 0u64;
    let mut last_percent = 0u8;

    loop {
        let filled = fill_chunk(&mut reader, &mut buffer).await?;
        if filled == 0 {
            break;
        }
        STANDARD.encode_string(&buffer[..filled], &mut data);
        binary_bytes += filled as u64;
        processed += 1;

        let expected = total_chunks.max(processed);
        let percent = ((processed * 100 + expected / 2) / expected).min(100) as u8;
        last_percent = last_percent.max(percent);
        sink.emit(EngineEvent::EncodeProgress {
            session,
            percent: last_percent,
        });
        tokio::task::yield_now().await;

        if filled < chunk_size {
            break;
        }
    }

    if processed > 0 && last_percent < 100 {
        sink.emit(EngineEvent::EncodeProgress {
            session,
            percent: 100,
        });
    }
    qp_debug!(
        "Session {} encoded {} bytes in {} chunks to {} characters",
        session,
        binary_bytes,
        processed,
        data.len()
    );

    Ok(EncodedPayload { data, binary_bytes })
}

/// Fills `buffer` unless the reader hits end of input first.
async fn fill_chunk<R>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
