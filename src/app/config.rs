//! Source configuration: where the passwd and group databases live.
//!
//! A config file uses `<key> = <value>` lines. Comments (lines starting with
//! `#`) and blank lines are ignored, unknown keys are skipped silently.
//!
//! ```text
//! # usrgrp-reader sources
//! passwd = /etc/passwd
//! group = /etc/group
//! ```

use crate::error::{AccountsError, Result, SourceKind};
use crate::snapshot::Snapshot;
use crate::sys;
use std::path::{Path, PathBuf};

pub const DEFAULT_PASSWD_PATH: &str = "/etc/passwd";
pub const DEFAULT_GROUP_PATH: &str = "/etc/group";

/// Locations of the two account databases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountsConfig {
    pub passwd_path: PathBuf,
    pub group_path: PathBuf,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            passwd_path: PathBuf::from(DEFAULT_PASSWD_PATH),
            group_path: PathBuf::from(DEFAULT_GROUP_PATH),
        }
    }
}

impl AccountsConfig {
    pub fn with_paths(passwd_path: impl Into<PathBuf>, group_path: impl Into<PathBuf>) -> Self {
        Self {
            passwd_path: passwd_path.into(),
            group_path: group_path.into(),
        }
    }

    /// Load a config file. Keys it does not set keep their defaults.
    ///
    /// # Errors
    ///
    /// `SourceUnavailable` if the file cannot be read, `Config` for a
    /// non-empty line without `=` or with an empty value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            AccountsError::SourceUnavailable {
                kind: SourceKind::Config,
                path: path.display().to_string(),
                source,
            }
        })?;
        let mut cfg = Self::default();
        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                return Err(config_error(path, idx + 1, "expected `key = value`"));
            };
            let (key, value) = (lhs.trim(), rhs.trim());
            if value.is_empty() {
                return Err(config_error(path, idx + 1, format!("empty value for `{key}`")));
            }
            match key {
                "passwd" => cfg.passwd_path = PathBuf::from(value),
                "group" => cfg.group_path = PathBuf::from(value),
                _ => {}
            }
        }
        Ok(cfg)
    }

    /// Open and parse both sources into a fresh snapshot.
    ///
    /// The group source is opened and parsed before the passwd source is touched.
    pub fn load(&self) -> Result<Snapshot> {
        let group_origin = self.group_path.display().to_string();
        let groups = sys::parse_groups(
            sys::open_source(&self.group_path, SourceKind::Group)?,
            &group_origin,
        )?;
        let passwd_origin = self.passwd_path.display().to_string();
        let users = sys::parse_passwd(
            sys::open_source(&self.passwd_path, SourceKind::Passwd)?,
            &passwd_origin,
        )?;
        Ok(Snapshot::new(groups, users))
    }
}

fn config_error(path: &Path, line: usize, message: impl Into<String>) -> AccountsError {
    AccountsError::Config {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}
