use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tracing::warn;

/// Daily ceiling on outbound SerpAPI calls.
pub const DAILY_LIMIT: u32 = 100;

/// Per-day request counter persisted as one JSON file mapping ISO dates to
/// counts. Every read-modify-write-persist cycle runs under a single mutex,
/// which is the only concurrency control: the guarantee is process-local, a
/// second process sharing the file can over-grant. Old entries are never
/// pruned; the counter "resets" by keying on the current date.
pub struct DailyQuota {
    path: PathBuf,
    limit: u32,
    lock: Mutex<()>,
}

impl DailyQuota {
    pub fn new(path: impl Into<PathBuf>, limit: u32) -> Self {
        Self {
            path: path.into(),
            limit,
            lock: Mutex::new(()),
        }
    }

    /// Consume one unit of today's budget. Returns false once the daily limit
    /// is reached, leaving the stored count untouched.
    pub fn try_consume(&self) -> bool {
        // A poisoned lock means another consumer panicked; the counter itself
        // lives on disk and is re-read below, so recover the guard.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let today = Local::now().date_naive().to_string();
        let mut counts = self.load();
        let count = counts.get(&today).copied().unwrap_or(0);
        if count >= self.limit {
            return false;
        }

        counts.insert(today, count + 1);
        // The grant stands even if the persist fails: the next successful
        // write re-converges the file.
        if let Err(e) = self.store(&counts) {
            warn!(error = %e, path = %self.path.display(), "failed to persist quota counter");
        }
        true
    }

    fn load(&self) -> HashMap<String, u32> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "quota counter unreadable, counting from zero");
                return HashMap::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(counts) => counts,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "quota counter corrupt, counting from zero");
                HashMap::new()
            }
        }
    }

    fn store(&self, counts: &HashMap<String, u32>) -> std::io::Result<()> {
        let json = serde_json::to_vec(counts)?;
        fs::write(&self.path, json)
    }
}
