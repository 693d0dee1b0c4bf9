use chrono::{DateTime, Utc};
use quickprint_logging::{qp_debug, qp_info, qp_warn};

use crate::job::{apply_result, push_bounded};
use crate::{
    build_print_url, estimate_encoded_size, format_bytes, AppState, CallbackParams, Effect,
    Msg, Notice, PrintJob, PrintRequest, PrintSettings, ResultStatus, SelectedFile,
    SessionId, TxId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => select_file(&mut state, file),
        Msg::EncodingProgress { session, percent } => {
            match state.encoding.as_mut() {
                Some(active) if active.id == session => {
                    active.progress = active.progress.max(percent.min(100));
                    state.mark_dirty();
                }
                _ => qp_debug!("Ignoring progress for stale encoding session {}", session),
            }
            Vec::new()
        }
        Msg::EncodingDone { session, result } => finish_encoding(&mut state, session, result),
        Msg::SettingsChanged(settings) => change_settings(&mut state, settings),
        Msg::PrintClicked { at } => submit_print(&mut state, at),
        Msg::RetryClicked { txid, at } => retry(&mut state, &txid, at),
        Msg::HandOffFailed { txid, reason } => {
            if state.pending.clear_if(&txid) {
                qp_warn!("Hand-off failed for {}: {}", txid, reason);
                state.mark_dirty();
                vec![Effect::Notify(Notice::error(format!(
                    "Failed to open SII URL Print Agent. Please ensure the app is installed. ({reason})"
                )))]
            } else {
                Vec::new()
            }
        }
        Msg::CallbackReceived { params, at } => receive_callback(&mut state, params, at),
        Msg::ClearClicked => {
            state.drop_selection();
            if let Some(txid) = state.pending.pending() {
                qp_info!("Clearing pending transaction {} locally", txid);
            }
            state.pending.clear_pending();
            Vec::new()
        }
        Msg::ClearHistoryClicked => {
            state.history.clear();
            state.mark_dirty();
            vec![Effect::ClearHistory]
        }
        Msg::RestoreHistory(jobs) => {
            state.replace_history(jobs);
            Vec::new()
        }
    };

    (state, effects)
}

fn select_file(state: &mut AppState, file: SelectedFile) -> Vec<Effect> {
    if let Some(txid) = state.pending() {
        return vec![Effect::Notify(Notice::error(format!(
            "Print job {txid} is still pending. Clear it before selecting another file."
        )))];
    }
    if !file.is_pdf {
        return vec![Effect::Notify(Notice::error("Please select a PDF file"))];
    }

    let budget = state.config.budget;
    if !budget.admits_raw(file.size) {
        qp_info!(
            "Rejecting {} before encoding: estimated {} bytes exceeds {}",
            file.filename,
            estimate_encoded_size(file.size),
            budget.limit()
        );
        state.drop_selection();
        return vec![Effect::Notify(Notice::error(format!(
            "File is too large to print via URL scheme. Maximum size is {}. \
             Please use a smaller PDF or simplify the layout.",
            format_bytes(budget.limit(), 2)
        )))];
    }

    let path = file.path.clone();
    let session = state.begin_session(file);
    vec![Effect::StartEncoding { session, path }]
}

fn finish_encoding(
    state: &mut AppState,
    session: SessionId,
    result: Result<String, String>,
) -> Vec<Effect> {
    if !state.is_active_session(session) {
        qp_debug!("Ignoring completion of stale encoding session {}", session);
        return Vec::new();
    }
    state.encoding = None;
    state.mark_dirty();

    let data = match result {
        Ok(data) => data,
        Err(message) => {
            state.drop_selection();
            return vec![Effect::Notify(Notice::error(format!(
                "Encoding failed: {message}"
            )))];
        }
    };

    let budget = state.config.budget;
    let encoded = data.len() as u64;
    if !budget.is_within_budget(encoded) {
        state.drop_selection();
        return vec![Effect::Notify(Notice::error(format!(
            "Encoded file exceeds URL scheme limit. Maximum size is {}.",
            format_bytes(budget.limit(), 2)
        )))];
    }

    let Some(selection) = state.selection.as_mut() else {
        return Vec::new();
    };
    selection.payload = Some(data);
    vec![Effect::Notify(Notice::info(format!(
        "{} is ready to print ({})",
        selection.file.filename,
        format_bytes(encoded, 2)
    )))]
}

fn change_settings(state: &mut AppState, settings: PrintSettings) -> Vec<Effect> {
    if state.pending.is_pending() || state.encoding.is_some() {
        return vec![Effect::Notify(Notice::error(
            "Settings cannot be changed while encoding or printing",
        ))];
    }
    if state.settings != settings {
        state.settings = settings;
        state.mark_dirty();
    }
    Vec::new()
}

fn submit_print(state: &mut AppState, at: DateTime<Utc>) -> Vec<Effect> {
    if let Some(txid) = state.pending() {
        return vec![Effect::Notify(Notice::error(format!(
            "Print job {txid} is already pending"
        )))];
    }
    let Some((file, data)) = state.ready_payload() else {
        return vec![Effect::Notify(Notice::error(
            "Select a PDF and wait for encoding to finish before printing",
        ))];
    };

    let txid = TxId::generate();
    let job = PrintJob {
        txid: txid.clone(),
        filename: file.filename.clone(),
        created_at: at,
        binary_bytes: file.size,
        base64_bytes: data.len() as u64,
        settings: state.settings,
        result: None,
    };
    let url = build_print_url(
        &PrintRequest {
            data,
            settings: &state.settings,
            txid: &txid,
        },
        &state.config.callback_base,
    );

    qp_info!("Submitting {} as transaction {}", job.filename, txid);
    state.pending.mark_pending(txid.clone());
    push_bounded(&mut state.history, job.clone());
    state.last_outcome = None;
    state.mark_dirty();

    vec![Effect::AppendHistory(job), Effect::HandOff { txid, url }]
}

fn retry(state: &mut AppState, txid: &TxId, at: DateTime<Utc>) -> Vec<Effect> {
    if let Some(pending) = state.pending() {
        return vec![Effect::Notify(Notice::error(format!(
            "Print job {pending} is already pending"
        )))];
    }
    let Some(job) = state.history.iter().find(|job| &job.txid == txid).cloned() else {
        return vec![Effect::Notify(Notice::error(format!(
            "No print job {txid} in history"
        )))];
    };
    if !job.is_failed() {
        return vec![Effect::Notify(Notice::error("Only failed jobs can be retried"))];
    }
    let same_file = state
        .ready_payload()
        .is_some_and(|(file, _)| file.filename == job.filename);
    if !same_file {
        return vec![Effect::Notify(Notice::error(
            "Please re-upload the file to retry",
        ))];
    }

    state.settings = PrintSettings::from_job(&job, &state.settings);
    submit_print(state, at)
}

fn receive_callback(
    state: &mut AppState,
    params: CallbackParams,
    at: DateTime<Utc>,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(txid) = params.txid.as_ref() {
        let result = params.to_result(at);
        if !apply_result(&mut state.history, txid, result.clone()) {
            qp_debug!("Callback for {} has no history entry", txid);
        }
        effects.push(Effect::UpdateHistoryResult {
            txid: txid.clone(),
            result,
        });
        if state.pending.clear_if(txid) {
            state.last_outcome = Some(params.status);
        } else {
            qp_warn!("Callback for {} does not match the pending transaction", txid);
        }
        state.mark_dirty();
    }

    let notice = match params.status {
        ResultStatus::Success => Notice::success("Printed successfully"),
        ResultStatus::Fail => {
            let mut text = match params.code {
                Some(code) => format!("Print failed (code: {code})"),
                None => "Print failed".to_string(),
            };
            if let Some(message) = params.message.as_deref() {
                text.push_str(": ");
                text.push_str(message);
            }
            Notice::error(text)
        }
    };
    effects.push(Effect::Notify(notice));
    effects
}
