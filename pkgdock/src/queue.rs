//! Upload queue engine.
//!
//! Tracks a batch of local archives on their way into the store. A run
//! processes the tasks that were pending when it started, in insertion
//! order, with exactly one upload in flight at a time — deliberate
//! backpressure that bounds connections to the gateway and keeps progress
//! reporting monotonic.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::classifier::{classify, Classification};
use crate::gateway::PackageGateway;

/// Message attached to tasks whose filename fails classification.
pub const INVALID_NAME_MESSAGE: &str =
    "Invalid format. Expected: name-version-linux-arch.zip/.tar.gz";

/// Global counter for generating unique task IDs.
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for an upload task. Client-local and ephemeral.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct TaskId(String);

impl TaskId {
    fn next() -> Self {
        let counter = TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("task-{}", counter))
    }

    /// Returns the string value of this task ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of one upload task.
///
/// `Pending → Uploading → Success` or `Pending → Uploading → Error`. A task
/// that reaches `Success` is immutable; an `Error` task is retried only by
/// removing it and adding the file again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Uploading,
    Success,
    Error(String),
}

impl TaskStatus {
    /// Returns true once the task reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Error(_))
    }

    /// Returns true while the task waits for a run.
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }
}

/// One file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadTask {
    id: TaskId,
    path: PathBuf,
    status: TaskStatus,
}

impl UploadTask {
    /// The task's id.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Path of the local archive bound to this task.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bare filename used for classification and display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Current status.
    pub fn status(&self) -> &TaskStatus {
        &self.status
    }
}

/// Tally of one queue run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Tasks that reached `Success` during this run.
    pub succeeded: usize,
    /// Tasks that reached `Error` during this run.
    pub failed: usize,
}

impl RunOutcome {
    /// Total tasks processed by this run.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Sequential, resumable upload queue.
pub struct UploadQueue {
    tasks: Vec<UploadTask>,
}

impl UploadQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Append a pending task for a local archive and return its id.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> TaskId {
        let task = UploadTask {
            id: TaskId::next(),
            path: path.into(),
            status: TaskStatus::Pending,
        };
        let id = task.id.clone();
        debug!(task = %id, file = %task.file_name(), "queued upload");
        self.tasks.push(task);
        id
    }

    /// Remove a task. Succeeded tasks are a record of outcome and cannot be
    /// removed; returns false for those and for unknown ids.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let removable = self
            .tasks
            .iter()
            .any(|t| &t.id == id && t.status != TaskStatus::Success);
        if removable {
            self.tasks.retain(|t| &t.id != id);
        }
        removable
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    /// Number of tasks still pending.
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status.is_pending()).count()
    }

    /// Derived progress: (finished, total) where finished counts both
    /// successes and errors.
    pub fn progress(&self) -> (usize, usize) {
        let finished = self.tasks.iter().filter(|t| t.status.is_finished()).count();
        (finished, self.tasks.len())
    }

    /// Process every task that is pending right now, strictly one at a time.
    ///
    /// Tasks added while the run is in progress stay pending; only a later
    /// `start` picks them up. Each task is classified locally first — a
    /// filename that fails classification becomes an error without any
    /// gateway call. Per-task failures do not abort the run.
    pub async fn start<G: PackageGateway>(&mut self, gateway: &G) -> RunOutcome {
        self.start_observed(gateway, |_, _| {}).await
    }

    /// Like [`start`](Self::start), emitting every status transition so
    /// callers can render or record them.
    pub async fn start_observed<G, F>(&mut self, gateway: &G, mut emit: F) -> RunOutcome
    where
        G: PackageGateway,
        F: FnMut(&TaskId, &TaskStatus),
    {
        let snapshot: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.status.is_pending())
            .map(|t| t.id.clone())
            .collect();

        info!(pending = snapshot.len(), "starting upload run");
        let mut outcome = RunOutcome::default();

        for id in &snapshot {
            self.transition(id, TaskStatus::Uploading, &mut emit);

            let (file_name, path) = match self.tasks.iter().find(|t| &t.id == id) {
                Some(task) => (task.file_name(), task.path.clone()),
                None => continue,
            };

            if classify(&file_name) == Classification::NoMatch {
                self.transition(id, TaskStatus::Error(INVALID_NAME_MESSAGE.to_string()), &mut emit);
                outcome.failed += 1;
                continue;
            }

            match gateway.upload_package(&path).await {
                Ok(_) => {
                    self.transition(id, TaskStatus::Success, &mut emit);
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    self.transition(id, TaskStatus::Error(e.to_string()), &mut emit);
                    outcome.failed += 1;
                }
            }
        }

        info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "upload run finished"
        );
        outcome
    }

    fn transition<F>(&mut self, id: &TaskId, status: TaskStatus, emit: &mut F)
    where
        F: FnMut(&TaskId, &TaskStatus),
    {
        if let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) {
            task.status = status;
            emit(&task.id, &task.status);
        }
    }
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new()
    }
}
