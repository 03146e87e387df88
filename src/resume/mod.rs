use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("reading resume file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing resume file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateSnapshot {
    url: String,
    total_paths: usize,
    completed_paths: Vec<String>,
}

struct StateInner {
    snapshot: StateSnapshot,
    done: HashSet<String>,
}

/// Durable record of scan progress so an interrupted run can pick up where
/// it left off. All operations serialize on one mutex; the file is JSON
/// `{"url", "total_paths", "completed_paths"}`.
pub struct ResumeState {
    path: PathBuf,
    inner: Mutex<StateInner>,
}

impl ResumeState {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>, total_paths: usize) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(StateInner {
                snapshot: StateSnapshot {
                    url: url.into(),
                    total_paths,
                    completed_paths: Vec::new(),
                },
                done: HashSet::new(),
            }),
        }
    }

    /// Reads an existing state from disk. Returns `Ok(None)` when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ResumeError> {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ResumeError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let snapshot: StateSnapshot = serde_json::from_slice(&data).map_err(|source| ResumeError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let done = snapshot.completed_paths.iter().cloned().collect();

        Ok(Some(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(StateInner { snapshot, done }),
        }))
    }

    pub fn url(&self) -> String {
        self.inner.lock().unwrap().snapshot.url.clone()
    }

    pub fn mark_completed(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        if inner.done.insert(path.to_string()) {
            inner.snapshot.completed_paths.push(path.to_string());
        }
    }

    pub fn is_completed(&self, path: &str) -> bool {
        self.inner.lock().unwrap().done.contains(path)
    }

    /// Filters a wordlist down to the paths not yet completed.
    pub fn filter_remaining(&self, paths: Vec<String>) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        paths.into_iter().filter(|p| !inner.done.contains(p)).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.inner.lock().unwrap().done.len()
    }

    pub fn save(&self) -> std::io::Result<()> {
        let data = {
            let inner = self.inner.lock().unwrap();
            serde_json::to_vec(&inner.snapshot)?
        };
        std::fs::write(&self.path, data)
    }

    /// Deletes the state file after a clean completion.
    pub fn remove(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}
