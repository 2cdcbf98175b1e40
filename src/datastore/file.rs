//! File-backed store
//!
//! A single worker thread owns the document table and the snapshot file.
//! Callers queue actions on a channel and block on a per-action reply
//! channel, bounded by the configured timeout.
//!
//! ```text
//! caller ──► Job{action, reply} ──► [ worker ] ──► Documents::apply
//!    ▲                                  │              │
//!    └───────── Result<Outcome> ◄───────┘      write_snapshot (mutations)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Result, SparkError};

use super::snapshot::{read_snapshot, write_snapshot};
use super::{Action, DataStore, Documents, Outcome};

/// Queued action with its reply channel
struct Job {
    action: Action,
    reply: Sender<Result<Outcome>>,
}

/// Persistent block metadata store
pub struct FileDataStore {
    config: Config,
    jobs: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl FileDataStore {
    /// Create the store without starting it
    pub fn new(config: Config) -> Self {
        Self {
            config,
            jobs: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    /// Create and start the store
    pub fn open(config: Config) -> Result<Self> {
        let store = Self::new(config);
        store.start()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.config.store_path
    }

    pub fn is_running(&self) -> bool {
        self.jobs.lock().is_some()
    }

    /// Load the snapshot and spawn the worker
    ///
    /// Starting a running store does nothing.
    pub fn start(&self) -> Result<()> {
        let mut jobs = self.jobs.lock();
        if jobs.is_some() {
            return Ok(());
        }

        let docs = Documents::from_documents(read_snapshot(&self.config.store_path)?)?;
        let (tx, rx) = channel::unbounded();
        let worker = Worker {
            path: self.config.store_path.clone(),
            read_only: self.config.read_only,
            docs,
        };

        let handle = thread::Builder::new()
            .name("sparkwire-store".to_string())
            .spawn(move || worker.run(rx))?;

        tracing::debug!("{} now available", self);
        *jobs = Some(tx);
        *self.worker.lock() = Some(handle);
        Ok(())
    }

    /// Stop the worker after it drains queued actions
    ///
    /// Closing a stopped store does nothing.
    pub fn close(&self) {
        let sender = self.jobs.lock().take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::warn!("{} worker panicked", self);
            }
        }
        tracing::debug!("{} shutdown", self);
    }
}

impl DataStore for FileDataStore {
    fn execute(&self, action: Action) -> Result<Outcome> {
        let (reply_tx, reply_rx) = channel::bounded(1);
        {
            let jobs = self.jobs.lock();
            let sender = jobs
                .as_ref()
                .ok_or_else(|| SparkError::StoreClosed(format!("{} not started", self)))?;
            sender
                .send(Job {
                    action,
                    reply: reply_tx,
                })
                .map_err(|_| SparkError::StoreClosed(format!("{} worker stopped", self)))?;
        }

        match reply_rx.recv_timeout(self.config.action_timeout()) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SparkError::Timeout(self.config.action_timeout_ms)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(SparkError::StoreClosed(format!("{} dropped the action", self)))
            }
        }
    }
}

impl Drop for FileDataStore {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Display for FileDataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<FileDataStore for {}>", self.config.store_path.display())
    }
}

impl fmt::Debug for FileDataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDataStore")
            .field("path", &self.config.store_path)
            .field("running", &self.is_running())
            .finish()
    }
}

// =============================================================================
// Worker
// =============================================================================

struct Worker {
    path: PathBuf,
    read_only: bool,
    docs: Documents,
}

impl Worker {
    fn run(mut self, jobs: Receiver<Job>) {
        for job in jobs {
            let result = if job.action.is_mutation() && !self.read_only {
                self.apply_persisted(job.action)
            } else {
                self.docs.apply(job.action)
            };

            // The caller may have timed out and gone away
            let _ = job.reply.send(result);
        }
    }

    /// Apply a mutation to a copy and keep it only once it is on disk
    fn apply_persisted(&mut self, action: Action) -> Result<Outcome> {
        let mut next = self.docs.clone();
        let outcome = next.apply(action)?;

        if let Err(e) = write_snapshot(&self.path, &next.to_documents()) {
            tracing::warn!("failed to persist {}: {}", self.path.display(), e);
            return Err(e);
        }

        self.docs = next;
        Ok(outcome)
    }
}
