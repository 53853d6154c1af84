//! Durable per-client journal of progression decisions.
//!
//! Layout on disk is a single JSON object mapping client id to its entries,
//! ordered by date. Writes go to a sibling temp file that is renamed over the
//! journal, so a failed write leaves the previous journal intact.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{HistoryEntry, ProgressionDecision};

type Journal = BTreeMap<String, Vec<HistoryEntry>>;

pub struct HistoryStore {
    path: PathBuf,
    // Held across the file write, so appends never interleave.
    journal: Mutex<Journal>,
}

impl HistoryStore {
    pub async fn open(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();

        let journal = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Journal::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Journal::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            clients = journal.len(),
            "history.opened"
        );

        Ok(Self {
            path,
            journal: Mutex::new(journal),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a decision set. Entries on the same date accumulate rather than
    /// merge; an older date is slotted in after every entry not later than it.
    pub async fn append(
        &self,
        client_id: &str,
        date: NaiveDate,
        decisions: &BTreeMap<String, ProgressionDecision>,
    ) -> EngineResult<HistoryEntry> {
        let entry = HistoryEntry::new(date, decisions);
        let mut journal = self.journal.lock().await;

        let previous = journal.get(client_id).cloned();
        let entries = journal.entry(client_id.to_string()).or_default();
        let position = entries.partition_point(|existing| existing.date <= date);
        entries.insert(position, entry.clone());

        if let Err(e) = self.persist(&journal).await {
            match previous {
                Some(previous) => journal.insert(client_id.to_string(), previous),
                None => journal.remove(client_id),
            };
            return Err(e);
        }

        info!(
            client_id,
            %date,
            exercises = entry.progressions.len(),
            "history.appended"
        );
        Ok(entry)
    }

    pub async fn latest(&self, client_id: &str) -> EngineResult<HistoryEntry> {
        self.journal
            .lock()
            .await
            .get(client_id)
            .and_then(|entries| entries.last().cloned())
            .ok_or_else(|| {
                EngineError::NotFound(format!("no progression history for client '{}'", client_id))
            })
    }

    pub async fn entries(&self, client_id: &str) -> Vec<HistoryEntry> {
        self.journal
            .lock()
            .await
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn persist(&self, journal: &Journal) -> EngineResult<()> {
        let bytes = serde_json::to_vec_pretty(journal)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let written = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                warn!(error = %cleanup, path = %tmp_path.display(), "history.tmp_cleanup_failed");
            }
            return Err(e.into());
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "history.persisted");
        Ok(())
    }
}
