//! Account snapshot holder and entry glue for the binary.
//!
//! [`Accounts`] owns a configuration and the latest [`Snapshot`]. Snapshots are
//! handed out behind an [`Arc`], so a reload never disturbs readers that still
//! hold an older one.
//!
pub mod cli;
pub mod config;

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::snapshot::Snapshot;

pub use config::AccountsConfig;

#[derive(Debug)]
pub struct Accounts {
    config: AccountsConfig,
    snapshot: Arc<Snapshot>,
}

impl Accounts {
    /// Build from `config` and parse both sources immediately.
    pub fn new(config: AccountsConfig) -> Result<Self> {
        let mut accounts = Self::empty(config);
        accounts.reload()?;
        Ok(accounts)
    }

    /// Build without parsing; the snapshot starts empty.
    pub fn empty(config: AccountsConfig) -> Self {
        Self {
            config,
            snapshot: Arc::new(Snapshot::default()),
        }
    }

    pub fn config(&self) -> &AccountsConfig {
        &self.config
    }

    /// The current snapshot. Empty after a failed [`reload`](Self::reload).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Re-read both sources.
    ///
    /// The held snapshot is cleared before parsing starts and only replaced on
    /// success, so a failed reload leaves it empty rather than stale or partial.
    pub fn reload(&mut self) -> Result<()> {
        self.snapshot = Arc::new(Snapshot::default());
        match self.config.load() {
            Ok(snapshot) => {
                info!(
                    groups = snapshot.groups().len(),
                    users = snapshot.users().len(),
                    "account snapshot loaded"
                );
                self.snapshot = Arc::new(snapshot);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "account reload failed, snapshot cleared");
                Err(err)
            }
        }
    }
}
