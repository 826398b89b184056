//! Process introspection via the proc filesystem: resident memory from
//! `/proc/self/status` and process CPU time summed over every task's
//! `/proc/self/task/<tid>/schedstat`. Both are plain text reads, so the
//! probe stays free of unsafe code and the source paths can be swapped out
//! in tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum MetricsError {
    Read { path: PathBuf, source: std::io::Error },
    Malformed { path: PathBuf, detail: String },
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed reading {}: {source}", path.display())
            }
            Self::Malformed { path, detail } => {
                write!(f, "malformed {}: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Malformed { .. } => None,
        }
    }
}

/// Point-in-time resource readings for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSnapshot {
    pub resident_bytes: u64,
    pub cpu_time: Duration,
}

#[derive(Debug, Clone)]
pub struct ProcessProbe {
    status_path: PathBuf,
    task_root: PathBuf,
}

impl ProcessProbe {
    #[must_use]
    pub fn for_current_process() -> Self {
        Self {
            status_path: PathBuf::from("/proc/self/status"),
            task_root: PathBuf::from("/proc/self/task"),
        }
    }

    #[must_use]
    pub fn with_paths(status_path: PathBuf, task_root: PathBuf) -> Self {
        Self {
            status_path,
            task_root,
        }
    }

    /// Current resident set size in bytes (the `VmRSS` field, reported by
    /// the kernel in kB).
    pub fn resident_memory_bytes(&self) -> Result<u64, MetricsError> {
        let raw = read_proc_file(&self.status_path)?;
        let line = raw
            .lines()
            .find_map(|line| line.strip_prefix("VmRSS:"))
            .ok_or_else(|| MetricsError::Malformed {
                path: self.status_path.clone(),
                detail: "missing VmRSS field".to_string(),
            })?;
        let kib = line
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u64>().ok())
            .ok_or_else(|| MetricsError::Malformed {
                path: self.status_path.clone(),
                detail: "unparsable VmRSS value".to_string(),
            })?;
        Ok(kib * 1024)
    }

    /// Cumulative on-CPU time for the whole process: the first schedstat
    /// field (nanoseconds) summed over every live task. Tasks that exit
    /// between the directory scan and the read are skipped.
    pub fn cpu_time(&self) -> Result<Duration, MetricsError> {
        let entries = std::fs::read_dir(&self.task_root).map_err(|source| MetricsError::Read {
            path: self.task_root.clone(),
            source,
        })?;

        let mut total = Duration::ZERO;
        for entry in entries {
            let entry = entry.map_err(|source| MetricsError::Read {
                path: self.task_root.clone(),
                source,
            })?;
            let path = entry.path().join("schedstat");
            let raw = match std::fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(MetricsError::Read { path, source }),
            };
            let nanos = raw
                .split_whitespace()
                .next()
                .and_then(|token| token.parse::<u64>().ok())
                .ok_or_else(|| MetricsError::Malformed {
                    path: path.clone(),
                    detail: "unparsable schedstat runtime".to_string(),
                })?;
            total += Duration::from_nanos(nanos);
        }
        Ok(total)
    }

    pub fn snapshot(&self) -> Result<ResourceSnapshot, MetricsError> {
        Ok(ResourceSnapshot {
            resident_bytes: self.resident_memory_bytes()?,
            cpu_time: self.cpu_time()?,
        })
    }
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self::for_current_process()
    }
}

fn read_proc_file(path: &Path) -> Result<String, MetricsError> {
    std::fs::read_to_string(path).map_err(|source| MetricsError::Read {
        path: path.to_path_buf(),
        source,
    })
}
