//! Submission journal
//!
//! Appends one JSON line per transaction the swap cycle submits (or would
//! submit, in dry-run mode). The journal is write-only; nothing reads it back.

use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Step of the swap cycle a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStep {
    SwapIn,
    Approve,
    SwapOut,
}

impl SwapStep {
    pub fn name(&self) -> &'static str {
        match self {
            SwapStep::SwapIn => "swap_in",
            SwapStep::Approve => "approve",
            SwapStep::SwapOut => "swap_out",
        }
    }
}

/// Entry in the journal
#[derive(Debug, Serialize)]
struct JournalEntry<'a> {
    timestamp: DateTime<Utc>,
    wallet: Address,
    step: SwapStep,
    tx_hash: B256,
    nonce: u64,
    value: &'a str,
    dry_run: bool,
}

/// Record of one built transaction, handed to the journal
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub wallet: Address,
    pub step: SwapStep,
    pub tx_hash: B256,
    pub nonce: u64,
    pub value: U256,
    pub dry_run: bool,
}

/// Append-only JSONL journal
pub struct SubmissionJournal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SubmissionJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn write(&self, record: &SubmissionRecord) -> std::io::Result<()> {
        let value = record.value.to_string();
        let entry = JournalEntry {
            timestamp: Utc::now(),
            wallet: record.wallet,
            step: record.step,
            tx_hash: record.tx_hash,
            nonce: record.nonce,
            value: &value,
            dry_run: record.dry_run,
        };

        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(&entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// Record a transaction; journal failures are logged, never propagated
    pub fn record(&self, record: &SubmissionRecord) {
        if let Err(e) = self.write(record) {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to write journal entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn appends_one_line_per_record() {
        let temp_file = NamedTempFile::new().unwrap();
        let journal = SubmissionJournal::new(temp_file.path());

        for (nonce, step) in [(0, SwapStep::SwapIn), (1, SwapStep::Approve)] {
            journal.record(&SubmissionRecord {
                wallet: Address::ZERO,
                step,
                tx_hash: B256::ZERO,
                nonce,
                value: U256::from(1_000u64),
                dry_run: true,
            });
        }

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["step"], "swap_in");
        assert_eq!(first["value"], "1000");
        assert_eq!(first["dry_run"], true);
        assert!(lines[1].contains("\"approve\""));
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let journal = SubmissionJournal::new("/nonexistent/dir/journal.jsonl");
        journal.record(&SubmissionRecord {
            wallet: Address::ZERO,
            step: SwapStep::SwapOut,
            tx_hash: B256::ZERO,
            nonce: 0,
            value: U256::ZERO,
            dry_run: false,
        });
    }
}
