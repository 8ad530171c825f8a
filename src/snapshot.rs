//! Immutable view of one parse pass plus the user/group relationship queries.
//!
//! Lookups are linear scans in source order and the first match wins, so
//! duplicate names or ids resolve the same way the system tools do.

use crate::error::Result;
use crate::sys::{self, SystemGroup, SystemUser};
use std::io::BufRead;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    groups: Vec<SystemGroup>,
    users: Vec<SystemUser>,
}

impl Snapshot {
    pub fn new(groups: Vec<SystemGroup>, users: Vec<SystemUser>) -> Self {
        Self { groups, users }
    }

    /// Parse a group source and a passwd source into a snapshot.
    ///
    /// Groups are parsed first; any failure in either source discards both.
    pub fn from_readers<G: BufRead, U: BufRead>(groups: G, users: U) -> Result<Self> {
        let groups = sys::parse_groups(groups, "group")?;
        let users = sys::parse_passwd(users, "passwd")?;
        Ok(Self { groups, users })
    }

    pub fn groups(&self) -> &[SystemGroup] {
        &self.groups
    }

    pub fn users(&self) -> &[SystemUser] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.users.is_empty()
    }

    pub fn user_by_id(&self, uid: i64) -> Option<&SystemUser> {
        self.users.iter().find(|u| u.uid == uid)
    }

    pub fn user_by_name(&self, name: &str) -> Option<&SystemUser> {
        self.users.iter().find(|u| u.name == name)
    }

    pub fn group_by_id(&self, gid: i64) -> Option<&SystemGroup> {
        self.groups.iter().find(|g| g.gid == gid)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&SystemGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Every user belonging to `group`.
    ///
    /// Users whose primary gid matches come first in snapshot order, then the
    /// explicit members in declaration order. Unknown member names are skipped
    /// and no user appears twice.
    pub fn users_in_group(&self, group: &SystemGroup) -> Vec<&SystemUser> {
        let mut users: Vec<&SystemUser> = self
            .users
            .iter()
            .filter(|u| u.primary_gid == group.gid)
            .collect();
        for name in &group.members {
            let Some(user) = self.user_by_name(name) else {
                continue;
            };
            if !users.iter().any(|u| std::ptr::eq(*u, user)) {
                users.push(user);
            }
        }
        users
    }

    /// Every group `user` belongs to, by primary gid or explicit membership,
    /// in snapshot order and without duplicates.
    pub fn groups_of_user(&self, user: &SystemUser) -> Vec<&SystemGroup> {
        let mut groups: Vec<&SystemGroup> = Vec::new();
        for group in &self.groups {
            if group.gid == user.primary_gid || group.lists_member(&user.name) {
                groups.push(group);
            }
        }
        groups
    }
}
