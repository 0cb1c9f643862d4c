//! Launch configuration model.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! explicit overrides from the command line or environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ROOTFS_DIR, MAX_HOSTNAME_LEN};
use crate::error::{BurrowError, Result};

/// Configuration shared by the supervisor and the isolated init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Directory that becomes `/` for the isolated init.
    pub rootfs: PathBuf,
    /// Hostname set inside the private UTS namespace, if any.
    pub hostname: Option<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            rootfs: PathBuf::from(DEFAULT_ROOTFS_DIR),
            hostname: None,
        }
    }
}

impl LaunchConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults; unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BurrowError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Resolves the effective configuration from an optional file and overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the result is invalid.
    pub fn resolve(
        file: Option<&Path>,
        rootfs: Option<PathBuf>,
        hostname: Option<String>,
    ) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(rootfs) = rootfs {
            config.rootfs = rootfs;
        }
        if hostname.is_some() {
            config.hostname = hostname;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the kernel would reject.
    ///
    /// # Errors
    ///
    /// Returns an error if `rootfs` is not absolute or the hostname is
    /// empty or longer than the kernel limit.
    pub fn validate(&self) -> Result<()> {
        if self.rootfs.as_os_str().is_empty() || !self.rootfs.is_absolute() {
            return Err(BurrowError::Config {
                message: format!(
                    "rootfs must be an absolute path, got '{}'",
                    self.rootfs.display()
                ),
            });
        }
        if let Some(hostname) = &self.hostname {
            if hostname.is_empty() || hostname.len() > MAX_HOSTNAME_LEN {
                return Err(BurrowError::Config {
                    message: format!(
                        "hostname must be 1-{MAX_HOSTNAME_LEN} bytes, got {}",
                        hostname.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_points_at_system_rootfs() {
        let config = LaunchConfig::default();
        assert_eq!(config.rootfs, PathBuf::from(DEFAULT_ROOTFS_DIR));
        assert!(config.hostname.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_fill_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hostname": "sandbox"}}"#).unwrap();

        let config = LaunchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.rootfs, PathBuf::from(DEFAULT_ROOTFS_DIR));
        assert_eq!(config.hostname.as_deref(), Some("sandbox"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rootfs": "/srv/alpine", "memory": 512}}"#).unwrap();

        let err = LaunchConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BurrowError::Serialization { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LaunchConfig::from_file(Path::new("/nonexistent/burrow.json")).unwrap_err();
        assert!(matches!(err, BurrowError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/burrow.json"));
    }

    #[test]
    fn overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rootfs": "/srv/alpine", "hostname": "a"}}"#).unwrap();

        let config = LaunchConfig::resolve(
            Some(file.path()),
            Some(PathBuf::from("/srv/debian")),
            Some("b".into()),
        )
        .unwrap();
        assert_eq!(config.rootfs, PathBuf::from("/srv/debian"));
        assert_eq!(config.hostname.as_deref(), Some("b"));
    }

    #[test]
    fn file_hostname_survives_absent_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hostname": "kept"}}"#).unwrap();

        let config = LaunchConfig::resolve(Some(file.path()), None, None).unwrap();
        assert_eq!(config.hostname.as_deref(), Some("kept"));
    }

    #[test]
    fn relative_rootfs_is_rejected() {
        let err = LaunchConfig::resolve(None, Some(PathBuf::from("rootfs")), None).unwrap_err();
        assert!(matches!(err, BurrowError::Config { .. }));
    }

    #[test]
    fn oversized_hostname_is_rejected() {
        let config = LaunchConfig {
            hostname: Some("h".repeat(MAX_HOSTNAME_LEN + 1)),
            ..LaunchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
