use crate::snapshot::Snapshot;
use crate::sys::{SystemGroup, SystemUser};

/// Users whose name, full name, home, shell, uid or primary gid contains `query`
/// (case-insensitive). An empty query matches every user.
pub fn search_users<'a>(snapshot: &'a Snapshot, query: &str) -> Vec<&'a SystemUser> {
    let q = query.to_lowercase();
    snapshot
        .users()
        .iter()
        .filter(|u| {
            q.is_empty()
                || u.name.to_lowercase().contains(&q)
                || u.full_name.to_lowercase().contains(&q)
                || u.home_dir.to_lowercase().contains(&q)
                || u.shell.to_lowercase().contains(&q)
                || u.uid.to_string().contains(&q)
                || u.primary_gid.to_string().contains(&q)
        })
        .collect()
}

/// Groups whose name, gid or any member name contains `query` (case-insensitive).
pub fn search_groups<'a>(snapshot: &'a Snapshot, query: &str) -> Vec<&'a SystemGroup> {
    let q = query.to_lowercase();
    snapshot
        .groups()
        .iter()
        .filter(|g| {
            q.is_empty()
                || g.name.to_lowercase().contains(&q)
                || g.gid.to_string().contains(&q)
                || g.members.iter().any(|m| m.to_lowercase().contains(&q))
        })
        .collect()
}
