use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use quickprint_core::SessionId;
use quickprint_logging::{qp_debug, qp_warn};

use crate::encode::{ChunkedBase64Encoder, EncodeSettings, PayloadEncoder, ProgressSink};
use crate::{EncodeError, EngineEvent};

enum EngineCommand {
    Encode { session: SessionId, path: PathBuf },
    Shutdown,
}

/// Runs encoding sessions on a background tokio runtime and reports their
/// events to a sink.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EncodeSettings, sink: Arc<dyn ProgressSink>) -> io::Result<Self> {
        Self::with_encoder(Arc::new(ChunkedBase64Encoder::new(settings)), sink)
    }

    pub fn with_encoder(
        encoder: Arc<dyn PayloadEncoder>,
        sink: Arc<dyn ProgressSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        let thread = thread::Builder::new()
            .name("quickprint-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Encode { session, path } => {
                            let encoder = encoder.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                encode_session(encoder.as_ref(), session, path, sink.as_ref())
                                    .await;
                            });
                        }
                        EngineCommand::Shutdown => break,
                    }
                }
                qp_debug!("Engine command loop finished");
                runtime.shutdown_background();
            })?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Queues an encoding session. Fails when the engine thread has stopped,
    /// in which case no event will ever arrive for `session`.
    pub fn encode(&self, session: SessionId, path: impl Into<PathBuf>) -> Result<(), EncodeError> {
        self.cmd_tx
            .send(EngineCommand::Encode {
                session,
                path: path.into(),
            })
            .map_err(|_| {
                qp_warn!("Engine thread is gone; cannot encode session {}", session);
                EncodeError::EngineStopped
            })
    }

    /// Stops the engine thread and cancels running sessions.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

async fn encode_session(
    encoder: &dyn PayloadEncoder,
    session: SessionId,
    path: PathBuf,
    sink: &dyn ProgressSink,
) {
    let result = encoder.encode(session, &path, sink).await;
    if let Err(err) = &result {
        qp_warn!("Encoding session {} failed: {}", session, err);
    }
    sink.emit(EngineEvent::EncodeCompleted { session, result });
}
