use chrono::{DateTime, Utc};

use crate::{Phase, PrintJob, PrintSettings, ResultStatus, TxId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileView {
    pub filename: String,
    pub binary_bytes: u64,
    pub estimated_base64_bytes: u64,
    pub encoded_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub selected_file: Option<SelectedFileView>,
    /// Encoding progress in percent while a session is running.
    pub progress: Option<u8>,
    pub pending_txid: Option<TxId>,
    pub settings: PrintSettings,
    pub size_limit: u64,
    pub can_print: bool,
    /// Newest first.
    pub history: Vec<HistoryRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub txid: TxId,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub base64_bytes: u64,
    pub status: Option<ResultStatus>,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub retryable: bool,
}

impl HistoryRowView {
    pub(crate) fn from_job(job: &PrintJob) -> Self {
        Self {
            txid: job.txid.clone(),
            filename: job.filename.clone(),
            created_at: job.created_at,
            base64_bytes: job.base64_bytes,
            status: job.result.as_ref().map(|result| result.status),
            code: job.result.as_ref().and_then(|result| result.code),
            message: job.result.as_ref().and_then(|result| result.message.clone()),
            retryable: job.is_failed(),
        }
    }
}
