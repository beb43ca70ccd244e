//! Directory management for snapfeed
//!
//! Handles initialization of the data directory structure: logs plus a
//! scratch area for screenshot temp files.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::ConfigError;

/// Required subdirectories within the data directory
const SUBDIRECTORIES: &[&str] = &["logs", "scratch"];

/// Directory permission mode (owner read/write/execute only)
#[cfg(unix)]
const DIR_PERMISSION_MODE: u32 = 0o700;

/// Manages the snapfeed data directory structure
#[derive(Debug, Clone)]
pub struct DirectoryManager {
    /// Base data directory (e.g., ~/.snapfeed/)
    data_dir: PathBuf,
}

impl DirectoryManager {
    /// Creates a new DirectoryManager with the specified data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the base data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the logs directory path
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Returns the scratch directory for screenshot temp files
    pub fn scratch_dir(&self) -> PathBuf {
        self.data_dir.join("scratch")
    }

    /// Returns the config file path
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Initializes the directory structure
    ///
    /// Creates the base data directory and all required subdirectories with
    /// owner-only permissions on Unix.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if directory creation fails
    pub fn initialize(&self) -> Result<(), ConfigError> {
        self.create_directory_with_permissions(&self.data_dir)?;

        for subdir in SUBDIRECTORIES {
            let path = self.data_dir.join(subdir);
            self.create_directory_with_permissions(&path)?;
        }

        tracing::info!("Initialized snapfeed data directory at {:?}", self.data_dir);
        Ok(())
    }

    fn create_directory_with_permissions(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            #[cfg(unix)]
            self.set_unix_permissions(path)?;
            return Ok(());
        }

        fs::create_dir_all(path)?;

        #[cfg(unix)]
        self.set_unix_permissions(path)?;

        tracing::debug!("Created directory: {:?}", path);
        Ok(())
    }

    #[cfg(unix)]
    fn set_unix_permissions(&self, path: &Path) -> Result<(), ConfigError> {
        let permissions = fs::Permissions::from_mode(DIR_PERMISSION_MODE);
        fs::set_permissions(path, permissions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let manager = DirectoryManager::new(PathBuf::from("/tmp/snapfeed"));
        assert_eq!(manager.data_dir(), Path::new("/tmp/snapfeed"));
        assert_eq!(manager.logs_dir(), PathBuf::from("/tmp/snapfeed/logs"));
        assert_eq!(manager.scratch_dir(), PathBuf::from("/tmp/snapfeed/scratch"));
        assert_eq!(
            manager.config_path(),
            PathBuf::from("/tmp/snapfeed/config.toml")
        );
    }

    #[test]
    fn test_initialize_creates_structure() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("snapfeed");
        let manager = DirectoryManager::new(data_dir.clone());

        manager.initialize().unwrap();

        assert!(data_dir.exists());
        assert!(data_dir.join("logs").exists());
        assert!(data_dir.join("scratch").exists());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = DirectoryManager::new(temp_dir.path().join("snapfeed"));

        manager.initialize().unwrap();
        manager.initialize().unwrap();

        assert!(manager.scratch_dir().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_initialize_sets_owner_only_permissions() {
        let temp_dir = TempDir::new().unwrap();
        let manager = DirectoryManager::new(temp_dir.path().join("snapfeed"));
        manager.initialize().unwrap();

        let mode = fs::metadata(manager.data_dir())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
