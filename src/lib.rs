//! Library crate for usrgrp-reader.
//!
//! This crate exposes a read-only snapshot of the local account databases:
//! - Flat-file parsing of `passwd` and `group` records (`sys`)
//! - The immutable snapshot and its membership queries (`snapshot`)
//! - In-memory search helpers (`search`)
//! - Source configuration, reload handling and the CLI (`app`)
//! - Error and result types (`error`)
//!
//! It is used by the `usrgrp-reader` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod search;
pub mod snapshot;
pub mod sys;

// Re-export commonly used items at the crate root for convenience
pub use app::{Accounts, AccountsConfig};
pub use error::{AccountsError, Result, SourceKind};
pub use snapshot::Snapshot;
pub use sys::{SystemGroup, SystemUser};
