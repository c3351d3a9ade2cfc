// Processing-state ledger — the single source of truth for "already handled".
//
// A persisted JSON document mapping bookmark id to processing outcome.
// Entries are immutable once written except for full replacement (the mark_*
// calls overwrite) or deletion (remove_entry / prune). Access is strictly
// sequential within one run; sharing the file between two concurrent
// processes is not supported (no locking, no optimistic versioning).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::source::models::Bookmark;

/// Current on-disk schema version. No migration logic — older documents
/// that still parse are accepted as-is.
pub const SCHEMA_VERSION: u32 = 1;

/// Outcome record for one processed bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedEntry {
    pub id: String,
    pub processed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Destination the routed action was sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Snapshot of the original bookmark, so reprocessing works even when
    /// the source no longer returns the post.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<Bookmark>,
}

/// The caller-supplied parts of an entry; timestamp and error are stamped
/// by the ledger itself.
#[derive(Debug, Clone, Default)]
pub struct EntryFields {
    pub author: Option<String>,
    pub destination: Option<String>,
    pub action: Option<String>,
    pub bookmark: Option<Bookmark>,
}

/// On-disk shape of the ledger.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerDocument {
    version: u32,
    #[serde(default)]
    last_run: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: HashMap<String, ProcessedEntry>,
}

/// In-memory ledger with explicit dirty/save lifecycle. Constructed once
/// per run and torn down via a final `save()` — never ambient state.
pub struct ProcessedLedger {
    path: PathBuf,
    last_run: Option<DateTime<Utc>>,
    entries: HashMap<String, ProcessedEntry>,
    dirty: bool,
}

impl ProcessedLedger {
    /// Load the ledger from `path`, falling back to an empty ledger when
    /// the file is missing or corrupt. A corrupt file is worth a warning
    /// but never a crash — losing dedup history beats losing the run.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<LedgerDocument>(&raw) {
                Ok(doc) => {
                    debug!(
                        path = %path.display(),
                        entries = doc.entries.len(),
                        "Ledger loaded"
                    );
                    return Self {
                        path: path.to_path_buf(),
                        last_run: doc.last_run,
                        entries: doc.entries,
                        dirty: false,
                    };
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt ledger, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            last_run: None,
            entries,
            dirty: false,
        }
    }

    pub fn is_processed(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get_entry(&self, id: &str) -> Option<&ProcessedEntry> {
        self.entries.get(id)
    }

    /// Record a successful outcome, overwriting any existing entry.
    pub fn mark_processed(&mut self, id: &str, fields: EntryFields) {
        self.insert(id, None, fields);
    }

    /// Record a failed outcome, overwriting any existing entry.
    pub fn mark_error(&mut self, id: &str, error: &str, fields: EntryFields) {
        self.insert(id, Some(error.to_string()), fields);
    }

    fn insert(&mut self, id: &str, error: Option<String>, fields: EntryFields) {
        self.entries.insert(
            id.to_string(),
            ProcessedEntry {
                id: id.to_string(),
                processed_at: Utc::now(),
                author: fields.author,
                destination: fields.destination,
                action: fields.action,
                error,
                bookmark: fields.bookmark,
            },
        );
        self.dirty = true;
    }

    /// Delete an entry so its bookmark can be reprocessed. Returns whether
    /// anything was removed.
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Delete every entry older than `max_age`, measured from the entry's
    /// own timestamp. Returns the count removed. Idempotent: a second call
    /// with no new old entries removes zero.
    pub fn prune(&mut self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let before = self.entries.len();
        self.entries.retain(|_, e| e.processed_at >= cutoff);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Ids of everything already handled — used to filter a fresh batch.
    pub fn processed_ids(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// The most recent entries, newest first. Ties broken by id so the
    /// order is stable within a call. Re-sorts the full collection per
    /// call — fine at ledger scale, and these calls are interactive.
    pub fn recent_entries(&self, limit: usize) -> Vec<&ProcessedEntry> {
        let mut entries: Vec<&ProcessedEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            b.processed_at
                .cmp(&a.processed_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        entries.truncate(limit);
        entries
    }

    /// The i-th most recent entry (0 = most recent).
    pub fn entry_by_index(&self, index: usize) -> Option<&ProcessedEntry> {
        self.recent_entries(index + 1).into_iter().nth(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many entries recorded an error outcome.
    pub fn error_count(&self) -> usize {
        self.entries.values().filter(|e| e.error.is_some()).count()
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the ledger if anything changed since the last save. The
    /// last-run timestamp is updated as a side effect of saving, not of
    /// mutation. Returns whether a write happened.
    ///
    /// Save failures are propagated: an unflushed ledger means silent
    /// reprocessing next run, and the operator should hear about it.
    pub fn save(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }

        self.last_run = Some(Utc::now());
        let doc = LedgerDocument {
            version: SCHEMA_VERSION,
            last_run: self.last_run,
            entries: self.entries.clone(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&doc).context("Failed to serialize ledger")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write ledger to {}", self.path.display()))?;

        self.dirty = false;
        debug!(path = %self.path.display(), entries = self.entries.len(), "Ledger saved");
        Ok(true)
    }
}
