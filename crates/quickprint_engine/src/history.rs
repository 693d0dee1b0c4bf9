use std::fs;
use std::io;
use std::path::PathBuf;

use quickprint_core::{apply_result, push_bounded, JobResult, PrintJob, TxId};
use quickprint_logging::{qp_debug, qp_error, qp_info, qp_warn};

use crate::persist::{AtomicFileWriter, PersistError};

/// File holding the JSON-serialized history, inside the data directory.
pub const HISTORY_FILENAME: &str = "quickprint_history.json";

/// Bounded, device-local log of submitted print jobs.
///
/// Every operation is best effort: failures are logged and never reach the
/// caller, so a broken disk cannot block printing. Single writer assumed.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    writer: AtomicFileWriter,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.into()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(HISTORY_FILENAME)
    }

    /// Oldest-first list of stored jobs; empty when missing or unreadable.
    pub fn load(&self) -> Vec<PrintJob> {
        match self.try_load() {
            Ok(jobs) => jobs,
            Err(err) => {
                qp_warn!("Ignoring unreadable history at {:?}: {}", self.path(), err);
                Vec::new()
            }
        }
    }

    /// Adds `job` at the end, evicting the oldest entries beyond the cap.
    pub fn append(&self, job: PrintJob) {
        let mut jobs = self.load();
        qp_debug!("Appending {} to history ({} stored)", job.txid, jobs.len());
        push_bounded(&mut jobs, job);
        self.save(&jobs);
    }

    /// Records the outcome of `txid`. Unknown ids are ignored; the job may
    /// have been evicted.
    pub fn update_result(&self, txid: &TxId, result: JobResult) {
        let mut jobs = self.load();
        if apply_result(&mut jobs, txid, result) {
            self.save(&jobs);
        } else {
            qp_info!("No history entry for {}; result not stored", txid);
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.writer.remove(HISTORY_FILENAME) {
            qp_error!("Failed to clear history at {:?}: {}", self.path(), err);
        }
    }

    fn try_load(&self) -> Result<Vec<PrintJob>, PersistError> {
        let content = match fs::read_to_string(self.path()) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, jobs: &[PrintJob]) {
        if let Err(err) = self.try_save(jobs) {
            qp_error!("Failed to write history to {:?}: {}", self.path(), err);
        }
    }

    fn try_save(&self, jobs: &[PrintJob]) -> Result<(), PersistError> {
        let content = serde_json::to_string(jobs)?;
        self.writer.write(HISTORY_FILENAME, &content)?;
        Ok(())
    }
}

