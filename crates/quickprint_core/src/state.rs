use std::path::PathBuf;

use crate::job::push_bounded;
use crate::view_model::{AppViewModel, HistoryRowView, SelectedFileView};
use crate::{
    estimate_encoded_size, PendingSlot, PrintJob, PrintSettings, ResultStatus, SizeBudget, TxId,
    MAX_HISTORY_ITEMS,
};

pub type SessionId = u64;

/// Where the agent sends its success/failure navigation by default.
pub const DEFAULT_CALLBACK_BASE: &str = "http://127.0.0.1:8765/print/callback";

/// A file picked by the user, as inspected by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
    pub is_pdf: bool,
}

/// Fixed parameters of a print session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub budget: SizeBudget,
    pub callback_base: String,
    pub default_settings: PrintSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            budget: SizeBudget::default(),
            callback_base: DEFAULT_CALLBACK_BASE.to_string(),
            default_settings: PrintSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Encoding,
    ReadyToPrint,
    Pending,
    Completed(ResultStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    pub(crate) file: SelectedFile,
    pub(crate) payload: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EncodingSession {
    pub(crate) id: SessionId,
    pub(crate) progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) config: SessionConfig,
    pub(crate) settings: PrintSettings,
    pub(crate) selection: Option<Selection>,
    pub(crate) encoding: Option<EncodingSession>,
    pub(crate) last_session: SessionId,
    pub(crate) pending: PendingSlot,
    pub(crate) last_outcome: Option<ResultStatus>,
    pub(crate) history: Vec<PrintJob>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            settings: config.default_settings,
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    pub fn pending(&self) -> Option<&TxId> {
        self.pending.pending()
    }

    /// Oldest-first copy of the in-memory history.
    pub fn history(&self) -> &[PrintJob] {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_pending() {
            Phase::Pending
        } else if self.encoding.is_some() {
            Phase::Encoding
        } else if let Some(status) = self.last_outcome {
            Phase::Completed(status)
        } else if self.ready_payload().is_some() {
            Phase::ReadyToPrint
        } else {
            Phase::Idle
        }
    }

    /// Selected file and its encoded payload, once encoding has finished.
    pub(crate) fn ready_payload(&self) -> Option<(&SelectedFile, &str)> {
        if self.encoding.is_some() {
            return None;
        }
        let selection = self.selection.as_ref()?;
        let payload = selection.payload.as_deref()?;
        Some((&selection.file, payload))
    }

    pub(crate) fn is_active_session(&self, session: SessionId) -> bool {
        self.encoding.is_some_and(|active| active.id == session)
    }

    pub(crate) fn begin_session(&mut self, file: SelectedFile) -> SessionId {
        self.last_session += 1;
        let id = self.last_session;
        self.selection = Some(Selection {
            file,
            payload: None,
        });
        self.encoding = Some(EncodingSession { id, progress: 0 });
        self.last_outcome = None;
        self.mark_dirty();
        id
    }

    pub(crate) fn drop_selection(&mut self) {
        self.selection = None;
        self.encoding = None;
        self.last_outcome = None;
        self.mark_dirty();
    }

    pub(crate) fn replace_history(&mut self, jobs: Vec<PrintJob>) {
        self.history.clear();
        for job in jobs {
            push_bounded(&mut self.history, job);
        }
        self.mark_dirty();
    }

    pub fn view(&self) -> AppViewModel {
        let selected_file = self.selection.as_ref().map(|selection| SelectedFileView {
            filename: selection.file.filename.clone(),
            binary_bytes: selection.file.size,
            estimated_base64_bytes: estimate_encoded_size(selection.file.size),
            encoded_bytes: selection.payload.as_ref().map(|data| data.len() as u64),
        });
        let phase = self.phase();
        let history = self
            .history
            .iter()
            .rev()
            .take(MAX_HISTORY_ITEMS)
            .map(HistoryRowView::from_job)
            .collect();

        AppViewModel {
            phase,
            selected_file,
            progress: self.encoding.map(|session| session.progress),
            pending_txid: self.pending.pending().cloned(),
            settings: self.settings,
            size_limit: self.config.budget.limit(),
            can_print: self.ready_payload().is_some() && !self.pending.is_pending(),
            history,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
