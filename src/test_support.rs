use crate::version::{Version, VersionRepository, VersionState};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// In-memory stand-in for the versioning collaborator.
///
/// `latest_draft` returns the most recently added draft in a content
/// grouping; `moderated_children` follows explicitly declared edges.
pub(crate) struct InMemoryVersions {
    versions: Vec<Version>,
    children: HashMap<String, Vec<String>>,
}

impl InMemoryVersions {
    pub(crate) fn new(versions: Vec<Version>) -> Self {
        Self {
            versions,
            children: HashMap::new(),
        }
    }

    pub(crate) fn set_children(&mut self, parent: &str, children: Vec<&str>) {
        self.children
            .insert(parent.to_string(), children.iter().map(|c| c.to_string()).collect());
    }

    fn find(&self, id: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }
}

impl VersionRepository for InMemoryVersions {
    fn latest_draft(&self, content: &str) -> Option<Version> {
        self.versions
            .iter()
            .filter(|v| v.content == content && v.state == VersionState::Draft)
            .next_back()
            .cloned()
    }

    fn moderated_children(&self, version: &Version) -> Vec<Version> {
        self.children
            .get(&version.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.find(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
