//! The append-only journal

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use warden_types::{new_audit_id, now_iso_millis, AuditEntry, Decision, Facts, GENESIS_HASH};

use crate::error::{AuditError, Result};
use crate::export::to_csv;
use crate::filter::AuditFilter;
use crate::verify::{verify_chain, ChainFault};

/// Hash-chained, append-only decision journal
///
/// Single-writer, multi-reader: `append` serialises on a writer lock held
/// across the chain-pointer update and the file write; queries and
/// verification run concurrently against the in-memory list or the file.
pub struct AuditLog {
    path: PathBuf,
    /// Chain pointer: the `previousHash` for the next append. The lock is
    /// async because it stays held across the file write.
    chain: tokio::sync::Mutex<String>,
    entries: RwLock<Vec<AuditEntry>>,
    degraded: AtomicBool,
}

impl AuditLog {
    /// Open a journal, restoring chain continuity from the last line
    ///
    /// With `preload` the whole journal is parsed into memory; without it
    /// only the final line is read, which restores the chain pointer
    /// without loading history. A missing or empty file starts the chain
    /// at the genesis hash. A malformed line aborts construction.
    pub async fn open(path: impl Into<PathBuf>, preload: bool) -> Result<Self> {
        let path = path.into();
        let (previous_hash, entries) = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                if preload {
                    let entries = parse_lines(&contents)?;
                    let previous = entries
                        .last()
                        .map(|e| e.hash.clone())
                        .unwrap_or_else(|| GENESIS_HASH.to_string());
                    (previous, entries)
                } else {
                    let previous = match last_non_empty_line(&contents) {
                        Some((line_no, line)) => {
                            let entry: AuditEntry = serde_json::from_str(line).map_err(
                                |source| AuditError::MalformedLine {
                                    line: line_no,
                                    source,
                                },
                            )?;
                            entry.hash
                        }
                        None => GENESIS_HASH.to_string(),
                    };
                    (previous, Vec::new())
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                (GENESIS_HASH.to_string(), Vec::new())
            }
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), preload, "journal opened");
        Ok(Self {
            path,
            chain: tokio::sync::Mutex::new(previous_hash),
            entries: RwLock::new(entries),
            degraded: AtomicBool::new(false),
        })
    }

    /// Append a decision, sealing it into the chain
    ///
    /// The entry is written to disk as one JSON line before the chain
    /// pointer advances. A failed write keeps the entry in memory and
    /// marks the journal degraded instead of failing the call: the journal
    /// is a sidecar to the decision, not a gatekeeper.
    pub async fn append(&self, decision: &Decision, input: &Facts) -> Result<AuditEntry> {
        let mut chain = self.chain.lock().await;

        let id = if decision.audit_id.is_empty() {
            new_audit_id()
        } else {
            decision.audit_id.clone()
        };
        let entry = AuditEntry::seal(
            id,
            now_iso_millis(),
            input.clone(),
            decision.clone(),
            chain.clone(),
        )?;

        let line = serde_json::to_string(&entry).map_err(warden_types::TypeError::from)?;
        if let Err(err) = self.write_line(&line).await {
            warn!(error = %err, path = %self.path.display(), "journal write failed, continuing in memory");
            self.degraded.store(true, Ordering::Release);
        }

        *chain = entry.hash.clone();
        self.entries.write().push(entry.clone());
        Ok(entry)
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }

    /// Filter the in-memory entries
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }

    /// Filter the journal as persisted, independent of in-memory state
    pub async fn query_from_disk(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let entries = self.read_disk().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect())
    }

    /// In-memory continuity check
    ///
    /// Anchored at the first in-memory entry's `previousHash`, which may
    /// not be genesis after a restart; use [`AuditLog::verify_full`] for
    /// the authoritative check.
    pub fn verify(&self) -> bool {
        self.diagnose().is_none()
    }

    /// First in-memory fault, if any
    pub fn diagnose(&self) -> Option<ChainFault> {
        let entries = self.entries.read();
        let anchor = entries.first().map(|e| e.previous_hash.clone());
        verify_chain(&entries, anchor.as_deref())
    }

    /// Authoritative integrity check: replay the journal from genesis
    ///
    /// Never mutates the journal; repeated calls return the same result.
    pub async fn verify_full(&self) -> Result<bool> {
        Ok(self.diagnose_full().await?.is_none())
    }

    /// First on-disk fault from genesis, if any
    pub async fn diagnose_full(&self) -> Result<Option<ChainFault>> {
        let entries = match self.read_disk().await {
            Ok(entries) => entries,
            Err(AuditError::MalformedLine { line, source }) => {
                return Ok(Some(ChainFault {
                    index: line.saturating_sub(1),
                    kind: crate::verify::FaultKind::Malformed,
                    detail: format!("journal line {line} is not valid JSON: {source}"),
                }))
            }
            Err(other) => return Err(other),
        };
        Ok(verify_chain(&entries, Some(GENESIS_HASH)))
    }

    /// CSV rendering of the in-memory entries
    pub fn export_csv(&self) -> String {
        to_csv(&self.entries.read())
    }

    /// Number of in-memory entries
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether a journal write has failed since opening
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// The `previousHash` the next append will use
    pub async fn head_hash(&self) -> String {
        self.chain.lock().await.clone()
    }

    /// Journal file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_disk(&self) -> Result<Vec<AuditEntry>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => parse_lines(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_lines(contents: &str) -> Result<Vec<AuditEntry>> {
    let mut entries = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: AuditEntry =
            serde_json::from_str(line).map_err(|source| AuditError::MalformedLine {
                line: index + 1,
                source,
            })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn last_non_empty_line(contents: &str) -> Option<(usize, &str)> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line))
        .last()
}
