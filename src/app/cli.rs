use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::app::{Accounts, AccountsConfig};
use crate::error::AccountsError;
use crate::search;
use crate::snapshot::Snapshot;
use crate::sys::{SystemGroup, SystemUser};

/// Query the local passwd and group databases.
#[derive(Debug, Parser)]
#[command(name = "usrgrp-reader", version, about)]
pub struct Cli {
    /// Path of the passwd database.
    #[arg(long, env = "USRGRP_PASSWD", value_name = "PATH")]
    pub passwd: Option<PathBuf>,

    /// Path of the group database.
    #[arg(long, env = "USRGRP_GROUP", value_name = "PATH")]
    pub group: Option<PathBuf>,

    /// Config file with `passwd = ...` / `group = ...` lines.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every user.
    Users {
        /// Only accounts with uid < 1000.
        #[arg(long, conflicts_with = "human")]
        system: bool,
        /// Only accounts with uid >= 1000.
        #[arg(long)]
        human: bool,
    },
    /// List every group.
    Groups,
    /// Show one user, by name or uid.
    User { key: String },
    /// Show one group, by name or gid.
    Group { key: String },
    /// Users belonging to a group, primary members first.
    Members { group: String },
    /// Groups a user belongs to.
    MemberOf { user: String },
    /// Case-insensitive search across users and groups.
    Search { query: String },
}

impl Cli {
    /// Flags win over the config file, which wins over the defaults.
    pub fn accounts_config(&self) -> Result<AccountsConfig> {
        let mut cfg = match &self.config {
            Some(path) => AccountsConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AccountsConfig::default(),
        };
        if let Some(p) = &self.passwd {
            cfg.passwd_path = p.clone();
        }
        if let Some(g) = &self.group {
            cfg.group_path = g.clone();
        }
        Ok(cfg)
    }
}

/// Load the snapshot and run `cli.command`, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = cli.accounts_config()?;
    let accounts = Accounts::new(config).context("reading account databases")?;
    let snap = accounts.snapshot();

    match &cli.command {
        Command::Users { system, human } => {
            for u in snap.users() {
                if (*system && !u.is_system()) || (*human && u.is_system()) {
                    continue;
                }
                writeln!(out, "{}", user_line(u))?;
            }
        }
        Command::Groups => {
            for g in snap.groups() {
                writeln!(out, "{}", group_line(g))?;
            }
        }
        Command::User { key } => writeln!(out, "{}", user_line(resolve_user(&snap, key)?))?,
        Command::Group { key } => writeln!(out, "{}", group_line(resolve_group(&snap, key)?))?,
        Command::Members { group } => {
            let group = resolve_group(&snap, group)?;
            for u in snap.users_in_group(group) {
                writeln!(out, "{}", user_line(u))?;
            }
        }
        Command::MemberOf { user } => {
            let user = resolve_user(&snap, user)?;
            for g in snap.groups_of_user(user) {
                writeln!(out, "{}", group_line(g))?;
            }
        }
        Command::Search { query } => {
            for u in search::search_users(&snap, query) {
                writeln!(out, "user\t{}", user_line(u))?;
            }
            for g in search::search_groups(&snap, query) {
                writeln!(out, "group\t{}", group_line(g))?;
            }
        }
    }
    Ok(())
}

/// Name lookup first, then a numeric uid.
pub fn resolve_user<'a>(snap: &'a Snapshot, key: &str) -> Result<&'a SystemUser, AccountsError> {
    snap.user_by_name(key)
        .or_else(|| key.parse().ok().and_then(|uid| snap.user_by_id(uid)))
        .ok_or_else(|| AccountsError::not_found("user", key))
}

/// Name lookup first, then a numeric gid.
pub fn resolve_group<'a>(snap: &'a Snapshot, key: &str) -> Result<&'a SystemGroup, AccountsError> {
    snap.group_by_name(key)
        .or_else(|| key.parse().ok().and_then(|gid| snap.group_by_id(gid)))
        .ok_or_else(|| AccountsError::not_found("group", key))
}

fn user_line(u: &SystemUser) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}{}",
        u.name,
        u.uid,
        u.primary_gid,
        u.full_name,
        u.home_dir,
        u.shell,
        if u.disabled { "\tdisabled" } else { "" }
    )
}

fn group_line(g: &SystemGroup) -> String {
    let members: Vec<&str> = g.members.iter().map(String::as_str).filter(|m| !m.is_empty()).collect();
    format!("{}\t{}\t{}", g.name, g.gid, members.join(","))
}
