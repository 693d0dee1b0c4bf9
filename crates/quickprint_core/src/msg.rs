use chrono::{DateTime, Utc};

use crate::{CallbackParams, PrintJob, PrintSettings, SelectedFile, SessionId, TxId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file; the platform layer has already inspected it.
    FileSelected(SelectedFile),
    /// Encoder progress for a session, in percent.
    EncodingProgress { session: SessionId, percent: u8 },
    /// Encoder finished a session: the Base64 payload or a read error.
    EncodingDone {
        session: SessionId,
        result: Result<String, String>,
    },
    /// User edited the print settings.
    SettingsChanged(PrintSettings),
    /// User clicked Print.
    PrintClicked { at: DateTime<Utc> },
    /// User asked to resend a failed job from the history.
    RetryClicked { txid: TxId, at: DateTime<Utc> },
    /// The agent URL could not be opened.
    HandOffFailed { txid: TxId, reason: String },
    /// The agent navigated back to one of our callback URLs.
    CallbackReceived {
        params: CallbackParams,
        at: DateTime<Utc>,
    },
    /// User clicked Clear: drop the selection and any pending job.
    ClearClicked,
    /// User clicked Clear History.
    ClearHistoryClicked,
    /// Restore the persisted history at startup.
    RestoreHistory(Vec<PrintJob>),
}
