//! QuickPrint core: pure print-job state machine, size budget, agent URL
//! codec and view-model helpers.
mod agent_url;
mod effect;
mod job;
mod msg;
mod size;
mod state;
mod tx;
mod update;
mod view_model;

pub use agent_url::{
    build_print_url, callback_url, parse_callback_params, parse_callback_url, CallbackParams,
    PrintRequest, AGENT_PRINT_URL, PAPER_WIDTH_MM,
};
pub use effect::{Effect, Notice, NoticeLevel};
pub use job::{
    apply_result, push_bounded, JobResult, PrintJob, PrintSettings, ResultStatus, Rotation,
    MAX_HISTORY_ITEMS,
};
pub use msg::Msg;
pub use size::{estimate_encoded_size, format_bytes, SizeBudget, DEFAULT_SIZE_LIMIT};
pub use state::{AppState, Phase, SelectedFile, SessionConfig, SessionId, DEFAULT_CALLBACK_BASE};
pub use tx::{PendingSlot, TxId};
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView, SelectedFileView};
