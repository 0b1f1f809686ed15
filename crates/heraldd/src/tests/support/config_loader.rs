//! Configuration fixtures and loaders for success and failure paths.

use std::collections::BTreeMap;
use std::fs;

use camino::Utf8PathBuf;
use herald_config::{Config, ConfigLoadError, Credentials, RoleId, WorkspaceEntry, WorkspaceId};
use tempfile::TempDir;

use crate::bootstrap::{ConfigLoader, FileConfigLoader};

/// Two role sets: `support` (workspace 100, roles 1 and 2) and
/// `support_dev` (workspace 200, role 3), polled every 10ms.
#[must_use]
pub fn sample_config() -> Config {
    let mut workspaces = BTreeMap::new();
    workspaces.insert(
        "support".to_owned(),
        WorkspaceEntry::new(WorkspaceId::new(100), [RoleId::new(1), RoleId::new(2)]),
    );
    workspaces.insert(
        "support_dev".to_owned(),
        WorkspaceEntry::new(WorkspaceId::new(200), [RoleId::new(3)]),
    );
    let mut config = Config::new(Credentials::new("test-token"), "!", workspaces);
    config.poll_interval_ms = 10;
    config
}

/// Loader returning [`sample_config`].
#[derive(Debug, Default)]
pub struct TestConfigLoader;

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, ConfigLoadError> {
        Ok(sample_config())
    }
}

/// Loader reading a file on disk that lacks the credentials field.
pub struct FailingConfigLoader {
    _dir: TempDir,
    inner: FileConfigLoader,
}

impl FailingConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temporary directory");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("config.json"))
            .expect("temporary path should be UTF-8");
        fs::write(
            &path,
            r#"{ "prefix": "!", "workspaces": { "support": { "workspace_id": 1, "role_ids": [] } } }"#,
        )
        .expect("write malformed configuration");
        Self {
            _dir: dir,
            inner: FileConfigLoader::new(path),
        }
    }
}

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, ConfigLoadError> {
        self.inner.load()
    }
}
