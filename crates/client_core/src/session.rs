//! Viewer identity: who is looking at the feed right now.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use shared::domain::{SessionIdentity, UserId};
use tracing::warn;

pub trait ViewerProvider: Send + Sync {
    fn current_viewer(&self) -> Option<SessionIdentity>;

    fn current_viewer_id(&self) -> Option<UserId> {
        self.current_viewer().map(|viewer| viewer.id)
    }
}

/// Fixed identity, or anonymous.
#[derive(Debug, Clone, Default)]
pub struct StaticViewer(Option<SessionIdentity>);

impl StaticViewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self(Some(SessionIdentity {
            id,
            username: username.into(),
        }))
    }
}

impl ViewerProvider for StaticViewer {
    fn current_viewer(&self) -> Option<SessionIdentity> {
        self.0.clone()
    }
}

/// Session identity persisted as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SessionIdentity>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read session file '{}'", self.path.display())
                })
            }
        };
        let identity = serde_json::from_str(&raw)
            .with_context(|| format!("malformed session file '{}'", self.path.display()))?;
        Ok(Some(identity))
    }

    pub fn save(&self, identity: &SessionIdentity) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let encoded = serde_json::to_string_pretty(identity)?;
        fs::write(&self.path, encoded)
            .with_context(|| format!("failed to write session file '{}'", self.path.display()))
    }

    /// Returns whether a session file was removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file '{}'", self.path.display())
            }),
        }
    }
}

impl ViewerProvider for FileSessionStore {
    fn current_viewer(&self) -> Option<SessionIdentity> {
        self.load().unwrap_or_else(|err| {
            warn!("session: treating viewer as anonymous: {err:#}");
            None
        })
    }
}
