use quickprint_core::{
    format_bytes, AppViewModel, HistoryRowView, Notice, NoticeLevel, Phase, PrintSettings,
    ResultStatus,
};

/// Turns successive view models into terminal lines, printing only what
/// changed since the previous render.
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<AppViewModel>,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let previous = self.last.as_ref();
        let mut lines = Vec::new();

        if let Some(percent) = view.progress {
            if previous.and_then(|prev| prev.progress) != Some(percent) {
                lines.push(format!("Encoding... {percent}%"));
            }
        }
        if previous.map(|prev| prev.phase) != Some(view.phase) {
            lines.push(phase_line(view));
        }
        if let Some(prev) = previous {
            if prev.settings != view.settings {
                lines.push(settings_line(&view.settings));
            }
        }

        self.last = Some(view.clone());
        lines
    }
}

pub fn phase_line(view: &AppViewModel) -> String {
    let filename = view
        .selected_file
        .as_ref()
        .map(|file| file.filename.as_str())
        .unwrap_or("-");
    match view.phase {
        Phase::Idle => "Idle. Select a PDF to print.".to_string(),
        Phase::Encoding => format!("Encoding {filename}"),
        Phase::ReadyToPrint => {
            let encoded = view
                .selected_file
                .as_ref()
                .and_then(|file| file.encoded_bytes)
                .unwrap_or(0);
            format!(
                "Ready to print {filename} ({} of {} allowed)",
                format_bytes(encoded, 2),
                format_bytes(view.size_limit, 2)
            )
        }
        Phase::Pending => match &view.pending_txid {
            Some(txid) => format!("Waiting for the print agent (txid {txid})"),
            None => "Waiting for the print agent".to_string(),
        },
        Phase::Completed(status) => format!("Last print: {status}"),
    }
}

pub fn settings_line(settings: &PrintSettings) -> String {
    let on_off = |value: bool| if value { "on" } else { "off" };
    let mut line = format!("Settings: fit {}", on_off(settings.fit_to_width));
    if let Some(rotation) = settings.rotation {
        line.push_str(&format!(", rotation {}", rotation.degrees()));
    }
    if let Some(timeout) = settings.timeout_ms {
        line.push_str(&format!(", timeout {timeout} ms"));
    }
    if let Some(dialog) = settings.error_dialog {
        line.push_str(&format!(", error dialog {}", on_off(dialog)));
    }
    line
}

pub fn status_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![phase_line(view)];
    if let Some(file) = &view.selected_file {
        lines.push(format!(
            "File: {} ({}, about {} encoded)",
            file.filename,
            format_bytes(file.binary_bytes, 2),
            format_bytes(file.estimated_base64_bytes, 2)
        ));
    }
    lines.push(settings_line(&view.settings));
    lines
}

/// One line per job, in the order given (the view model keeps newest first).
pub fn history_lines(rows: &[HistoryRowView]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No print history".to_string()];
    }
    rows.iter().map(history_line).collect()
}

fn history_line(row: &HistoryRowView) -> String {
    let outcome = match row.status {
        None => "pending".to_string(),
        Some(ResultStatus::Success) => "success".to_string(),
        Some(ResultStatus::Fail) => {
            let mut text = "fail".to_string();
            if let Some(code) = row.code {
                text.push_str(&format!(" (code: {code})"));
            }
            if let Some(message) = &row.message {
                text.push_str(&format!(": {message}"));
            }
            text
        }
    };
    let mut line = format!(
        "{}  {}  {}  {}  {}",
        row.created_at.format("%Y-%m-%d %H:%M:%S"),
        row.txid,
        row.filename,
        format_bytes(row.base64_bytes, 2),
        outcome
    );
    if row.retryable {
        line.push_str("  [retry]");
    }
    line
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use quickprint_core::{SelectedFileView, TxId};

    fn row(status: Option<ResultStatus>, code: Option<i64>) -> HistoryRowView {
        HistoryRowView {
            txid: TxId::from("tx-1"),
            filename: "label.pdf".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap(),
            base64_bytes: 1536,
            status,
            code,
            message: None,
            retryable: status == Some(ResultStatus::Fail),
        }
    }

    #[test]
    fn history_shows_size_and_error_code() {
        let lines = history_lines(&[
            row(Some(ResultStatus::Fail), Some(7)),
            row(Some(ResultStatus::Success), None),
            row(None, None),
        ]);
        assert_eq!(
            lines,
            vec![
                "2026-05-04 09:30:00  tx-1  label.pdf  1.5 KB  fail (code: 7)  [retry]",
                "2026-05-04 09:30:00  tx-1  label.pdf  1.5 KB  success",
                "2026-05-04 09:30:00  tx-1  label.pdf  1.5 KB  pending",
            ]
        );
    }

    #[test]
    fn empty_history_has_placeholder() {
        assert_eq!(history_lines(&[]), vec!["No print history"]);
    }

    #[test]
    fn renderer_prints_only_changes() {
        let mut renderer = Renderer::default();
        let idle = AppViewModel::default();
        assert_eq!(renderer.render(&idle), vec!["Idle. Select a PDF to print."]);
        assert!(renderer.render(&idle).is_empty());

        let encoding = AppViewModel {
            phase: Phase::Encoding,
            progress: Some(40),
            selected_file: Some(SelectedFileView {
                filename: "label.pdf".to_string(),
                binary_bytes: 300,
                estimated_base64_bytes: 400,
                encoded_bytes: None,
            }),
            ..AppViewModel::default()
        };
        assert_eq!(
            renderer.render(&encoding),
            vec!["Encoding... 40%", "Encoding label.pdf"]
        );

        let later = AppViewModel {
            progress: Some(80),
            ..encoding.clone()
        };
        assert_eq!(renderer.render(&later), vec!["Encoding... 80%"]);
    }

    #[test]
    fn notices_are_tagged_by_level() {
        assert_eq!(
            notice_line(&Notice::error("Please select a PDF file")),
            "[error] Please select a PDF file"
        );
        assert_eq!(notice_line(&Notice::success("Printed successfully")), "[ok] Printed successfully");
    }
}
