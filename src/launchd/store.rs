use std::path::{Path, PathBuf};

/// Location of the supervisor's job-definition files.
///
/// One descriptor per label, keyed by file name. Defaults to
/// `/Library/LaunchDaemons` in production; tests point it at a tempdir.
#[derive(Debug, Clone)]
pub struct JobStore {
    dir: PathBuf,
}

impl JobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the descriptor for `label`.
    pub fn descriptor_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.plist"))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.descriptor_path(label).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_path_appends_the_plist_extension() {
        let store = JobStore::new("/Library/LaunchDaemons");
        assert_eq!(
            store.descriptor_path("io.deferctl.deferred-action"),
            PathBuf::from("/Library/LaunchDaemons/io.deferctl.deferred-action.plist")
        );
    }
}
