use std::sync::{mpsc, Arc};

use quickprint_core::{Effect, Msg, Notice};
use quickprint_engine::{
    AgentLauncher, EncodeSettings, EngineEvent, EngineHandle, HistoryStore, ProgressSink,
};
use quickprint_logging::{payload_summary, qp_info, qp_warn};

use super::app::SessionEvent;

/// Executes effects produced by `update`; results come back as messages on
/// the session channel.
pub struct EffectRunner {
    engine: EngineHandle,
    history: HistoryStore,
    launcher: Arc<dyn AgentLauncher>,
    events: mpsc::Sender<SessionEvent>,
}

impl EffectRunner {
    pub fn new(
        encode_settings: EncodeSettings,
        history: HistoryStore,
        launcher: Arc<dyn AgentLauncher>,
        events: mpsc::Sender<SessionEvent>,
    ) -> std::io::Result<Self> {
        let sink = Arc::new(SessionSink {
            events: events.clone(),
        });
        let engine = EngineHandle::new(encode_settings, sink)?;
        Ok(Self {
            engine,
            history,
            launcher,
            events,
        })
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    /// Runs `effects` in order and hands back the notices for display.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartEncoding { session, path } => {
                    qp_info!("StartEncoding session={} path={:?}", session, path);
                    if let Err(err) = self.engine.encode(session, path) {
                        let _ = self.events.send(SessionEvent::Msg(Msg::EncodingDone {
                            session,
                            result: Err(err.to_string()),
                        }));
                    }
                }
                Effect::AppendHistory(job) => self.history.append(job),
                Effect::UpdateHistoryResult { txid, result } => {
                    self.history.update_result(&txid, result)
                }
                Effect::ClearHistory => self.history.clear(),
                Effect::HandOff { txid, url } => {
                    qp_info!("HandOff txid={} url={}", txid, payload_summary(&url));
                    if let Err(err) = self.launcher.launch(&url) {
                        qp_warn!("Hand-off for {} failed: {}", txid, err);
                        let _ = self.events.send(SessionEvent::Msg(Msg::HandOffFailed {
                            txid,
                            reason: err.to_string(),
                        }));
                    }
                }
                Effect::Notify(notice) => notices.push(notice),
            }
        }
        notices
    }
}

struct SessionSink {
    events: mpsc::Sender<SessionEvent>,
}

impl ProgressSink for SessionSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(SessionEvent::Msg(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::EncodeProgress { session, percent } => {
            Msg::EncodingProgress { session, percent }
        }
        EngineEvent::EncodeCompleted { session, result } => Msg::EncodingDone {
            session,
            result: result
                .map(|payload| payload.data)
                .map_err(|err| err.to_string()),
        },
    }
}
