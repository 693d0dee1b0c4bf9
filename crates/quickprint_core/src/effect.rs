use std::path::PathBuf;

use crate::{JobResult, PrintJob, SessionId, TxId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartEncoding { session: SessionId, path: PathBuf },
    AppendHistory(PrintJob),
    UpdateHistoryResult { txid: TxId, result: JobResult },
    ClearHistory,
    /// Open the agent URL. Irreversible once it succeeds.
    HandOff { txid: TxId, url: String },
    Notify(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Short user-facing message (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
