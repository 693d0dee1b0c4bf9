use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TxId;

/// Most recent jobs kept in the print history.
pub const MAX_HISTORY_ITEMS: usize = 20;

/// Page rotation accepted by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    None,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::None),
            270 => Ok(Rotation::Clockwise270),
            other => Err(format!("unsupported rotation {other}, expected 0 or 270")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// Options sent with a print job. Older history entries only carry
/// `fit_to_width`; the rest are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    #[serde(default = "default_fit_to_width")]
    pub fit_to_width: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_dialog: Option<bool>,
}

fn default_fit_to_width() -> bool {
    true
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            fit_to_width: true,
            rotation: Some(Rotation::None),
            timeout_ms: Some(15_000),
            error_dialog: Some(true),
        }
    }
}

impl PrintSettings {
    /// Settings recorded on `job`, with fields the job predates taken from
    /// `fallback`.
    pub fn from_job(job: &PrintJob, fallback: &PrintSettings) -> Self {
        Self {
            fit_to_width: job.settings.fit_to_width,
            rotation: job.settings.rotation.or(fallback.rotation),
            timeout_ms: job.settings.timeout_ms.or(fallback.timeout_ms),
            error_dialog: job.settings.error_dialog.or(fallback.error_dialog),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Fail,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Success => write!(f, "success"),
            ResultStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Outcome reported by the agent's callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub status: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub at: DateTime<Utc>,
}

/// One print submission as stored in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub txid: TxId,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub binary_bytes: u64,
    pub base64_bytes: u64,
    #[serde(flatten)]
    pub settings: PrintSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
}

impl PrintJob {
    pub fn is_failed(&self) -> bool {
        matches!(
            self.result,
            Some(JobResult {
                status: ResultStatus::Fail,
                ..
            })
        )
    }
}

/// Appends `job` and drops the oldest entries beyond [`MAX_HISTORY_ITEMS`].
pub fn push_bounded(history: &mut Vec<PrintJob>, job: PrintJob) {
    history.push(job);
    if history.len() > MAX_HISTORY_ITEMS {
        let overflow = history.len() - MAX_HISTORY_ITEMS;
        history.drain(..overflow);
    }
}

/// Sets the result of the first job with `txid`. Returns false when no such
/// job exists (it may have been evicted).
pub fn apply_result(history: &mut [PrintJob], txid: &TxId, result: JobResult) -> bool {
    match history.iter_mut().find(|job| &job.txid == txid) {
        Some(job) => {
            job.result = Some(result);
            true
        }
        None => false,
    }
}
