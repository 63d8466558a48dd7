//! In-memory session store.
//!
//! Maps session IDs to mutex-guarded [`SessionContext`]s. The per-session
//! `tokio::sync::Mutex` is held across an entire monitor cycle so two batches
//! for the same session can never interleave tool dispatch; different
//! sessions proceed in parallel.
//!
//! Policy: `update` never auto-creates. Callers initialize first (the API
//! boundary uses [`SessionStore::get_or_initialize`]).

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use vigil_core::interview::JobData;
use vigil_core::session::{ContextUpdate, InterviewSnapshot, SessionContext};

use crate::errors::{Result, RuntimeError};

/// Shared handle to one session's context.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// Process-wide map of interview sessions.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
    default_job_data: Option<Arc<JobData>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that seeds every new session with the given job data.
    #[must_use]
    pub fn with_job_data(job_data: Arc<JobData>) -> Self {
        Self {
            sessions: DashMap::new(),
            default_job_data: Some(job_data),
        }
    }

    fn new_context(&self, session_id: &str) -> SessionContext {
        let mut ctx = SessionContext::new(session_id);
        ctx.job_data = self.default_job_data.clone();
        ctx
    }

    /// Pure lookup; no implicit creation.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.get(session_id).map(|e| Arc::clone(e.value()))
    }

    /// Create a fresh zeroed context, overwriting any existing one.
    pub fn initialize(&self, session_id: &str) -> SessionHandle {
        debug!(session_id, "session initialized");
        let handle = Arc::new(Mutex::new(self.new_context(session_id)));
        let _ = self
            .sessions
            .insert(session_id.to_owned(), Arc::clone(&handle));
        handle
    }

    /// Idempotent lookup-or-create, used at the API boundary.
    pub fn get_or_initialize(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.get(session_id) {
            return handle;
        }
        // Entry API keeps a concurrent double-create from leaving two
        // contexts for the same ID alive.
        Arc::clone(
            self.sessions
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(self.new_context(session_id))))
                .value(),
        )
    }

    /// Merge a partial update into an existing session.
    pub async fn update(&self, session_id: &str, update: ContextUpdate) -> Result<()> {
        let handle = self
            .get(session_id)
            .ok_or_else(|| RuntimeError::session_not_found(session_id))?;
        handle.lock().await.apply(update);
        Ok(())
    }

    /// Read-only progression snapshot of an existing session.
    pub async fn snapshot(&self, session_id: &str) -> Result<InterviewSnapshot> {
        let handle = self
            .get(session_id)
            .ok_or_else(|| RuntimeError::session_not_found(session_id))?;
        let snapshot = handle.lock().await.snapshot();
        Ok(snapshot)
    }

    /// Remove a session, returning whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// IDs of all live sessions.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}
