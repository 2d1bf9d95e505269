// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Open playgrounds, keyed by entry file.
//!
//! The registry is an explicit value owned by the editor integration, not process-wide state.
//! Each entry carries a run guard: a second run of the same file while one is in flight fails
//! with [`ExecutionError::RunInProgress`] instead of re-preparing a workspace that is in use.
//!
//! Guards belong to the scratch directory, not the session. Playgrounds that resolve to the
//! same workspace share one guard, and a guard held by a running playground survives `close`,
//! so reopening the file mid-run still sees the run in flight.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::engine::RunSummary;
use crate::errors::ExecutionError;
use crate::playground::{Playground, RunCallbacks};

type RunGuard = Arc<Mutex<()>>;

struct Session {
    playground: Arc<Playground>,
    run_guard: RunGuard,
}

#[derive(Default)]
struct Sessions {
    open: HashMap<PathBuf, Session>,
    /// Guards by scratch directory. Kept alive by open sessions and in-flight runs.
    guards: HashMap<PathBuf, Weak<Mutex<()>>>,
}

impl Sessions {
    fn guard_for(&mut self, workspace: PathBuf) -> RunGuard {
        self.guards.retain(|_, guard| guard.strong_count() > 0);
        if let Some(guard) = self.guards.get(&workspace).and_then(Weak::upgrade) {
            return guard;
        }
        let guard = Arc::new(Mutex::new(()));
        self.guards.insert(workspace, Arc::downgrade(&guard));
        guard
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<Sessions>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a playground under its entry file.
    ///
    /// Opening a file that is already open keeps the existing session and returns it.
    pub async fn open(&self, playground: Playground) -> Arc<Playground> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.open.get(playground.entry()) {
            return session.playground.clone();
        }

        let run_guard = sessions.guard_for(playground.workspace_path());
        let playground = Arc::new(playground);
        sessions.open.insert(
            playground.entry().to_path_buf(),
            Session {
                playground: playground.clone(),
                run_guard,
            },
        );
        playground
    }

    pub async fn get(&self, entry: &Path) -> Option<Arc<Playground>> {
        self.sessions
            .read()
            .await
            .open
            .get(entry)
            .map(|session| session.playground.clone())
    }

    /// Forget a file's session. A run already in flight finishes on its own and keeps the
    /// file's guard held until it does.
    pub async fn close(&self, entry: &Path) -> bool {
        self.sessions.write().await.open.remove(entry).is_some()
    }

    pub async fn clear(&self) {
        self.sessions.write().await.open.clear();
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.open.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.open.is_empty()
    }

    pub async fn is_running(&self, entry: &Path) -> bool {
        self.sessions
            .read()
            .await
            .open
            .get(entry)
            .map(|session| session.run_guard.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Run the playground open for `entry`, one run per file at a time.
    pub async fn run(
        &self,
        entry: &Path,
        callbacks: RunCallbacks<'_>,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, ExecutionError> {
        let (playground, guard) = {
            let sessions = self.sessions.read().await;
            let session = sessions.open.get(entry).ok_or_else(|| ExecutionError::NoSession {
                path: entry.to_path_buf(),
            })?;
            (session.playground.clone(), session.run_guard.clone())
        };

        let _running = guard
            .try_lock_owned()
            .map_err(|_| ExecutionError::RunInProgress {
                path: entry.to_path_buf(),
            })?;

        playground.run(callbacks, cancel).await
    }
}
