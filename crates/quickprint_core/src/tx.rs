use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction id attached to one print submission and echoed back by the
/// agent's callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Mints a fresh random (v4) id in canonical hyphenated form.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TxId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TxId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the single transaction that was handed to the agent and has not
/// called back yet.
///
/// `mark_pending` overwrites unconditionally; callers enforcing one job at a
/// time check `is_pending` first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingSlot {
    txid: Option<TxId>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pending(&mut self, txid: TxId) {
        self.txid = Some(txid);
    }

    pub fn clear_pending(&mut self) {
        self.txid = None;
    }

    /// Clears the slot only when it holds `txid`. Returns whether it did.
    pub fn clear_if(&mut self, txid: &TxId) -> bool {
        if self.txid.as_ref() == Some(txid) {
            self.txid = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<&TxId> {
        self.txid.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.txid.is_some()
    }
}
