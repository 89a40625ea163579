use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppResult;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only log of user actions, one `timestamp,session,action,value` line each
///
/// The file is opened for every write and closed right after. Writers from
/// different processes are not coordinated.
#[derive(Debug, Clone)]
pub struct ActionLog {
    path: PathBuf,
}

impl ActionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one action line
    pub async fn record(&self, session_id: Uuid, action: &str, value: &str) -> AppResult<()> {
        let line = format!(
            "{},{},{},{}\n",
            Local::now().format(TIMESTAMP_FORMAT),
            session_id,
            action,
            value
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(session_id = %session_id, action, value, "Action logged");
        Ok(())
    }

    /// Like [`record`](Self::record), but a failed write only produces a warning
    pub async fn record_or_warn(&self, session_id: Uuid, action: &str, value: &str) {
        if let Err(e) = self.record(session_id, action, value).await {
            tracing::warn!(
                error = %e,
                path = %self.path.display(),
                action,
                "Failed to write action log"
            );
        }
    }
}
