//! Browser-local-storage stand-in: a JSON snapshot of the interview state
//! under the configured data directory.
//!
//! Failures never surface to callers as errors. A full disk, a read-only
//! directory, or a corrupted snapshot log a warning and degrade to "nothing
//! saved" / "nothing to resume"; losing a save is acceptable, crashing the
//! session is not.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::state::InterviewState;

const SNAPSHOT_FILE: &str = "interview.json";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    directory: PathBuf,
}

impl SnapshotStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.directory.join(SNAPSHOT_FILE)
    }

    /// Persist the state. Quota and permission problems are logged and
    /// swallowed. The write goes through a sibling temp file and a rename so
    /// a crash cannot leave a half-written snapshot behind.
    pub async fn save(&self, state: &InterviewState) {
        if let Err(error) = self.try_save(state).await {
            warn!(target: "handoff::storage", %error, "snapshot save failed; continuing without persistence");
        }
    }

    async fn try_save(&self, state: &InterviewState) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let serialized = serde_json::to_vec_pretty(state)
            .map_err(|error| std::io::Error::other(error.to_string()))?;
        let path = self.snapshot_path();
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, &serialized).await?;
        tokio::fs::rename(&staging, &path).await?;
        debug!(target: "handoff::storage", path = %path.display(), bytes = serialized.len(), "snapshot saved");
        Ok(())
    }

    /// Load the persisted state if a readable, well-formed snapshot exists.
    pub async fn load(&self) -> Option<InterviewState> {
        let path = self.snapshot_path();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(target: "handoff::storage", %error, "snapshot unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(error) => {
                warn!(target: "handoff::storage", %error, "snapshot corrupted; starting fresh");
                None
            }
        }
    }

    pub async fn has_saved(&self) -> bool {
        tokio::fs::try_exists(self.snapshot_path())
            .await
            .unwrap_or(false)
    }

    pub async fn clear(&self) {
        match tokio::fs::remove_file(self.snapshot_path()).await {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                warn!(target: "handoff::storage", %error, "snapshot removal failed");
            }
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Debounced autosaver: dispatchers notify it on every transition and it
/// coalesces bursts into one write after a quiet period, mirroring the
/// original one-second autosave. A digest of the last written snapshot
/// short-circuits writes when nothing actually changed.
pub struct Autosave {
    tx: mpsc::UnboundedSender<InterviewState>,
}

impl Autosave {
    pub fn spawn(store: Arc<SnapshotStore>, debounce: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<InterviewState>();
        tokio::spawn(async move {
            let mut last_digest: Option<[u8; 32]> = None;
            while let Some(mut pending) = rx.recv().await {
                // Quiet-period coalescing: keep swallowing newer states until
                // no change arrives within the debounce window.
                loop {
                    match tokio::time::timeout(debounce, rx.recv()).await {
                        Ok(Some(newer)) => pending = newer,
                        Ok(None) | Err(_) => break,
                    }
                }
                let digest = snapshot_digest(&pending);
                if last_digest == Some(digest) {
                    debug!(target: "handoff::storage", "autosave skipped; state unchanged");
                    continue;
                }
                store.save(&pending).await;
                last_digest = Some(digest);
            }
        });
        Self { tx }
    }

    /// Hand the latest state to the background writer. Dropped silently if
    /// the writer is gone; persistence is best-effort by design.
    pub fn notify(&self, state: InterviewState) {
        let _ = self.tx.send(state);
    }
}

fn snapshot_digest(state: &InterviewState) -> [u8; 32] {
    let serialized = serde_json::to_vec(state).unwrap_or_default();
    Sha256::digest(&serialized).into()
}
