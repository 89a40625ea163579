use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Session;
use crate::services::{source_for, ActionLog, Catalog, DatasetCache, DatasetSource};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Everything handlers reach through [`AppState`]
pub struct AppStateInner {
    pub source: Arc<dyn DatasetSource>,
    pub cache: DatasetCache,
    pub sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    pub action_log: ActionLog,
    pub example_limit: usize,
    /// Sessions untouched for longer than this are dropped
    pub session_idle: Duration,
}

/// A stored session and when it was last used
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session: Session,
    pub touched: Instant,
}

impl SessionEntry {
    fn new(session: Session) -> Self {
        Self {
            session,
            touched: Instant::now(),
        }
    }

    fn is_idle(&self, now: Instant, limit: Duration) -> bool {
        now.saturating_duration_since(self.touched) > limit
    }
}

impl AppState {
    /// Creates state around a dataset source with no sessions yet
    pub fn new(
        source: Arc<dyn DatasetSource>,
        action_log: ActionLog,
        example_limit: usize,
        session_idle: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                source,
                cache: DatasetCache::new(),
                sessions: RwLock::new(HashMap::new()),
                action_log,
                example_limit,
                session_idle,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            source_for(&config.dataset_url),
            ActionLog::new(&config.action_log_path),
            config.example_limit,
            Duration::from_secs(config.session_idle_secs),
        )
    }

    /// The cleaned catalog, loaded on first use and cached afterwards
    pub async fn catalog(&self) -> AppResult<Arc<Catalog>> {
        self.inner.cache.get_or_load(self.inner.source.as_ref()).await
    }

    pub fn example_limit(&self) -> usize {
        self.inner.example_limit
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.inner.action_log
    }

    /// Current state of a live session, marking it as used
    pub async fn session(&self, id: Uuid) -> AppResult<Session> {
        self.update_session(id, |session| session).await
    }

    /// Stores a new session, dropping idle ones first
    pub async fn insert_session(&self, session: Session) {
        let mut sessions = self.inner.sessions.write().await;
        self.evict_idle(&mut sessions);
        sessions.insert(session.id, SessionEntry::new(session));
    }

    /// Read-modify-write of one session under a single write guard
    pub async fn update_session<F>(&self, id: Uuid, change: F) -> AppResult<Session>
    where
        F: FnOnce(Session) -> Session,
    {
        let mut sessions = self.inner.sessions.write().await;
        self.evict_idle(&mut sessions);

        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))?;
        entry.session = change(entry.session.clone());
        entry.touched = Instant::now();

        Ok(entry.session.clone())
    }

    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>) {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.inner.session_idle));

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "Idle sessions evicted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Choice;
    use crate::services::dataset::MockDatasetSource;

    fn state(session_idle: Duration) -> AppState {
        AppState::new(
            Arc::new(MockDatasetSource::new()),
            ActionLog::new("unused.csv"),
            5,
            session_idle,
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_selects_are_all_kept() {
        let state = state(Duration::from_secs(60));

        let mut ids = Vec::new();
        for _ in 0..100 {
            let session = Session::new();
            ids.push(session.id);
            state.insert_session(session).await;
        }

        let mut tasks = Vec::new();
        for id in ids.iter().copied() {
            let decade_state = state.clone();
            tasks.push(tokio::spawn(async move {
                decade_state
                    .update_session(id, |s| s.select(Choice::Decade(2010)))
                    .await
            }));
            let genre_state = state.clone();
            tasks.push(tokio::spawn(async move {
                genre_state
                    .update_session(id, |s| s.select(Choice::Genre("drama".to_string())))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        for id in ids {
            let session = state.session(id).await.unwrap();
            assert_eq!(session.criteria.decade, Some(2010));
            assert_eq!(session.criteria.genre.as_deref(), Some("drama"));
        }
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let state = state(Duration::from_millis(20));

        let stale = Session::new();
        let stale_id = stale.id;
        state.insert_session(stale).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        let fresh = Session::new();
        let fresh_id = fresh.id;
        state.insert_session(fresh).await;

        assert_eq!(state.session_count().await, 1);
        assert!(matches!(state.session(stale_id).await, Err(AppError::NotFound(_))));
        assert!(state.session(fresh_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_active_sessions_are_kept() {
        let state = state(Duration::from_secs(60));
        let session = Session::new();
        let id = session.id;
        state.insert_session(session).await;

        state.insert_session(Session::new()).await;

        assert_eq!(state.session_count().await, 2);
        assert!(state.session(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_of_unknown_session_is_not_found() {
        let state = state(Duration::from_secs(60));
        let result = state.update_session(Uuid::new_v4(), |s| s.reset()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
