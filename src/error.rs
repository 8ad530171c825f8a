use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Which input a record or failure belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Group,
    Passwd,
    Config,
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Group => write!(f, "group"),
            SourceKind::Passwd => write!(f, "passwd"),
            SourceKind::Config => write!(f, "config"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    /// The source could not be opened or read.
    #[error("{kind} source {path} unavailable: {source}")]
    SourceUnavailable {
        kind: SourceKind,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A data line had the wrong number of `:`-separated fields.
    ///
    /// `record` counts the records accepted before the bad line, not physical lines.
    #[error("unexpected field count in {kind} file on record {record}: got {fields}")]
    MalformedRecord {
        kind: SourceKind,
        record: usize,
        fields: usize,
    },

    /// An exact-match lookup found nothing; raised by the CLI resolvers only.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// A config file line that is not `key = value`.
    #[error("{}:{line}: {message}", .path.display())]
    Config {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl AccountsError {
    /// Shorthand for [`AccountsError::NotFound`].
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        AccountsError::NotFound { what, key: key.into() }
    }
}

pub type Result<T> = std::result::Result<T, AccountsError>;
