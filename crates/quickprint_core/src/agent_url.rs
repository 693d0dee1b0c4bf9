//! Agent URL serialization and callback parsing.
//!
//! The agent accepts a single `siiprintagent://` URL carrying the whole job;
//! when it finishes it navigates to one of the two callback URLs embedded in
//! the request, optionally appending its own `Code`/`Message` parameters.

use chrono::{DateTime, Utc};
use url::form_urlencoded;
use url::Url;

use crate::{JobResult, PrintSettings, ResultStatus, TxId};

/// Scheme, version and action understood by the agent.
pub const AGENT_PRINT_URL: &str = "siiprintagent://1.0/print";
/// Paper width in millimetres; the supported printers only take 58 mm rolls.
pub const PAPER_WIDTH_MM: &str = "58";

/// Everything the agent URL is built from.
#[derive(Debug, Clone, Copy)]
pub struct PrintRequest<'a> {
    pub data: &'a str,
    pub settings: &'a PrintSettings,
    pub txid: &'a TxId,
}

/// Outcome extracted from a callback navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub status: ResultStatus,
    pub txid: Option<TxId>,
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl CallbackParams {
    /// History record for this outcome, stamped with the arrival time.
    pub fn to_result(&self, at: DateTime<Utc>) -> JobResult {
        JobResult {
            status: self.status,
            code: self.code,
            message: self.message.clone(),
            at,
        }
    }
}

/// Serializes `request` into the agent URL. Parameter order is fixed so the
/// output is deterministic.
pub fn build_print_url(request: &PrintRequest<'_>, callback_base: &str) -> String {
    let settings = request.settings;
    let mut query = form_urlencoded::Serializer::new(String::with_capacity(
        request.data.len() + request.data.len() / 8 + 256,
    ));
    query
        .append_pair("Format", "pdf")
        .append_pair("Data", request.data)
        .append_pair("PaperWidth", PAPER_WIDTH_MM)
        .append_pair("FitToWidth", yes_no(settings.fit_to_width));
    if let Some(rotation) = settings.rotation {
        query.append_pair("Rotation", &rotation.degrees().to_string());
    }
    if let Some(timeout_ms) = settings.timeout_ms {
        query.append_pair("Timeout", &timeout_ms.to_string());
    }
    if let Some(error_dialog) = settings.error_dialog {
        query.append_pair("ErrorDialog", yes_no(error_dialog));
    }
    query
        .append_pair(
            "CallbackSuccess",
            &callback_url(callback_base, ResultStatus::Success, request.txid),
        )
        .append_pair(
            "CallbackFail",
            &callback_url(callback_base, ResultStatus::Fail, request.txid),
        );

    format!("{AGENT_PRINT_URL}?{}", query.finish())
}

/// Callback URL the agent navigates to for `status`.
pub fn callback_url(callback_base: &str, status: ResultStatus, txid: &TxId) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("status", &status.to_string())
        .append_pair("txid", txid.as_str())
        .finish();
    let separator = if callback_base.contains('?') { '&' } else { '?' };
    format!("{callback_base}{separator}{params}")
}

/// Parses a callback query string (with or without the leading `?`).
///
/// Accepts both our own `status`/`txid` parameters and the agent's
/// `Code`/`Message` convention. Without an explicit status, a non-empty code
/// means failure.
pub fn parse_callback_params(query: &str) -> CallbackParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let get = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };
    let get_any = |names: &[&str]| names.iter().find_map(|name| get(*name));

    let raw_code = get_any(&["Code", "code"]).filter(|value| !value.is_empty());
    let status = match get("status").map(str::to_ascii_lowercase).as_deref() {
        Some("success") => ResultStatus::Success,
        Some("fail") => ResultStatus::Fail,
        _ if raw_code.is_some() => ResultStatus::Fail,
        _ => ResultStatus::Success,
    };

    CallbackParams {
        status,
        txid: get("txid").filter(|value| !value.is_empty()).map(TxId::from),
        code: raw_code.and_then(|value| value.trim().parse().ok()),
        message: get_any(&["Message", "message"]).map(ToOwned::to_owned),
    }
}

/// Parses a full callback URL, e.g. the request line seen by the listener.
pub fn parse_callback_url(raw: &str) -> Result<CallbackParams, url::ParseError> {
    let parsed = Url::parse(raw)?;
    Ok(parse_callback_params(parsed.query().unwrap_or_default()))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
