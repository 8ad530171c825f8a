//! Flat-file parser for the local account databases.
//!
//! Both formats are line oriented and `:`-delimited. Lines starting with `#`
//! are skipped; every other line must carry the exact field count for its
//! format or the whole source is rejected.

use crate::error::{AccountsError, Result, SourceKind};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Fields in a `group` record: `name:password:gid:members`.
pub const GROUP_FIELDS: usize = 4;
/// Fields in a `passwd` record: `name:password:uid:gid:gecos:home:shell`.
pub const PASSWD_FIELDS: usize = 7;

/// Highest uid/gid considered a system account.
pub const SYSTEM_ID_LIMIT: i64 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemUser {
    pub uid: i64,
    pub name: String,
    pub primary_gid: i64,
    pub full_name: String,
    /// Lexically cleaned home directory.
    pub home_dir: String,
    pub shell: String,
    /// Derived from `shell` at parse time, see [`shell_disables_login`].
    pub disabled: bool,
}

impl SystemUser {
    /// Accounts with a uid in `0..1000` are treated as system accounts.
    /// Negative uids (such as `nobody` at -2) are not.
    pub fn is_system(&self) -> bool {
        (0..SYSTEM_ID_LIMIT).contains(&self.uid)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemGroup {
    pub gid: i64,
    pub name: String,
    /// Explicit (secondary) members in declaration order.
    ///
    /// An empty member column yields a single empty string, which never
    /// resolves to a user.
    pub members: Vec<String>,
}

impl SystemGroup {
    pub fn lists_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }
}

/// Open a path-based source for buffered line reading.
pub fn open_source<P: AsRef<Path>>(path: P, kind: SourceKind) -> Result<BufReader<File>> {
    let path = path.as_ref();
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| AccountsError::SourceUnavailable {
            kind,
            path: path.display().to_string(),
            source,
        })
}

/// Parse every group record from `reader`. `origin` names the source in errors.
pub fn parse_groups<R: BufRead>(reader: R, origin: &str) -> Result<Vec<SystemGroup>> {
    read_records(reader, SourceKind::Group, origin, GROUP_FIELDS, |fields| SystemGroup {
        name: fields[0].to_string(),
        gid: parse_id(fields[2], "gid"),
        members: fields[3].split(',').map(str::to_string).collect(),
    })
}

/// Parse every passwd record from `reader`. `origin` names the source in errors.
pub fn parse_passwd<R: BufRead>(reader: R, origin: &str) -> Result<Vec<SystemUser>> {
    read_records(reader, SourceKind::Passwd, origin, PASSWD_FIELDS, |fields| {
        let shell = fields[6].to_string();
        SystemUser {
            name: fields[0].to_string(),
            uid: parse_id(fields[2], "uid"),
            primary_gid: parse_id(fields[3], "gid"),
            full_name: fields[4].to_string(),
            home_dir: clean_path(fields[5]),
            disabled: shell_disables_login(&shell),
            shell,
        }
    })
}

fn read_records<R, T, F>(
    reader: R,
    kind: SourceKind,
    origin: &str,
    expected: usize,
    mut build: F,
) -> Result<Vec<T>>
where
    R: BufRead,
    F: FnMut(&[&str]) -> T,
{
    let mut records = Vec::new();
    for raw in reader.split(b'\n') {
        let mut raw = raw.map_err(|source| AccountsError::SourceUnavailable {
            kind,
            path: origin.to_string(),
            source,
        })?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        // Legacy GECOS entries are often Latin-1; keep the record rather than reject the file.
        let line = String::from_utf8_lossy(&raw);
        if line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != expected {
            return Err(AccountsError::MalformedRecord {
                kind,
                record: records.len(),
                fields: fields.len(),
            });
        }
        records.push(build(&fields));
    }
    debug!(%kind, origin, count = records.len(), "parsed account records");
    Ok(records)
}

/// Numeric columns that do not parse as a signed integer fall back to 0
/// instead of failing the source. Negative ids keep their value.
fn parse_id(field: &str, column: &'static str) -> i64 {
    field.parse().unwrap_or_else(|_| {
        trace!(column, value = field, "non-numeric id, using 0");
        0
    })
}

/// Login is disabled for an empty shell or any shell path mentioning `nologin` or `false`.
pub fn shell_disables_login(shell: &str) -> bool {
    shell.is_empty() || shell.contains("nologin") || shell.contains("false")
}

/// Lexically clean a slash-separated path.
///
/// Repeated separators and `.` segments are dropped, `..` consumes the
/// preceding segment (and is discarded at the root), and an empty path
/// becomes `.`. The filesystem is never consulted.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }
    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn parse_passwd_basic() {
		let data = "\
root:x:0:0:root:/root:/bin/bash
jdoe:x:1000:1000:John Doe,,,:/home//jdoe/:/bin/zsh
";
		let users = parse_passwd(Cursor::new(data), "passwd").unwrap();

		assert_eq!(users.len(), 2);
		assert_eq!(users[0].name, "root");
		assert_eq!(users[0].uid, 0);
		assert_eq!(users[0].full_name, "root");
		assert_eq!(users[1].name, "jdoe");
		assert_eq!(users[1].uid, 1000);
		assert_eq!(users[1].full_name, "John Doe,,,");
		assert_eq!(users[1].home_dir, "/home/jdoe");
		assert_eq!(users[1].shell, "/bin/zsh");
		assert!(!users[1].disabled);
	}

	#[test]
	fn parse_group_basic() {
		let data = "\
root:x:0:
wheel:x:998:root,jdoe
";
		let groups = parse_groups(Cursor::new(data), "group").unwrap();

		assert_eq!(groups.len(), 2);
		assert_eq!(groups[0].name, "root");
		assert_eq!(groups[0].gid, 0);
		assert_eq!(groups[0].members, vec![String::new()]);
		assert_eq!(groups[1].name, "wheel");
		assert_eq!(groups[1].gid, 998);
		assert_eq!(groups[1].members, vec!["root".to_string(), "jdoe".to_string()]);
	}

	#[test]
	fn comments_only_at_column_zero() {
		let data = "# header\nbin:x:1:\n #indented:x:2:\n";
		let groups = parse_groups(Cursor::new(data), "group").unwrap();
		assert_eq!(groups.len(), 2);
		assert_eq!(groups[1].name, " #indented");
	}

	#[test]
	fn field_count_error_reports_accepted_records() {
		let data = "# comment\nroot:x:0:\n# another\nbin:x:1\n";
		let err = parse_groups(Cursor::new(data), "group").unwrap_err();
		match err {
			AccountsError::MalformedRecord { kind, record, fields } => {
				assert_eq!(kind, SourceKind::Group);
				assert_eq!(record, 1);
				assert_eq!(fields, 3);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn passwd_with_extra_field_is_rejected() {
		let data = "root:x:0:0:root:/root:/bin/bash:extra\n";
		let err = parse_passwd(Cursor::new(data), "passwd").unwrap_err();
		assert!(matches!(
			err,
			AccountsError::MalformedRecord { kind: SourceKind::Passwd, record: 0, fields: 8 }
		));
	}

	#[test]
	fn blank_line_is_malformed() {
		let data = "root:x:0:\n\nbin:x:1:\n";
		let err = parse_groups(Cursor::new(data), "group").unwrap_err();
		assert!(matches!(err, AccountsError::MalformedRecord { record: 1, fields: 1, .. }));
	}

	#[test]
	fn bad_numbers_default_to_zero() {
		let data = "odd:x:abc:1.5:Odd:/tmp:/bin/sh\n";
		let users = parse_passwd(Cursor::new(data), "passwd").unwrap();
		assert_eq!(users[0].uid, 0);
		assert_eq!(users[0].primary_gid, 0);
	}

	#[test]
	fn negative_and_wide_ids_keep_their_value() {
		let users = parse_passwd(
			Cursor::new("nobody:*:-2:-2:Unprivileged User:/var/empty:/usr/bin/false\nbig:x:4294967296:+7::/:/bin/sh\n"),
			"passwd",
		)
		.unwrap();
		assert_eq!(users[0].uid, -2);
		assert_eq!(users[0].primary_gid, -2);
		assert!(!users[0].is_system());
		assert_eq!(users[1].uid, 4_294_967_296);
		assert_eq!(users[1].primary_gid, 7);

		let groups = parse_groups(Cursor::new("nobody:*:-2:\n"), "group").unwrap();
		assert_eq!(groups[0].gid, -2);
	}

	#[test]
	fn non_utf8_gecos_is_kept() {
		let data: &[u8] = b"jose:x:1001:100:Jos\xe9 Garc\xeda:/home/jose:/bin/bash\nana:x:1002:100::/home/ana:/bin/sh\n";
		let users = parse_passwd(Cursor::new(data), "passwd").unwrap();
		assert_eq!(users.len(), 2);
		assert_eq!(users[0].name, "jose");
		assert_eq!(users[0].uid, 1001);
		assert!(users[0].full_name.starts_with("Jos"));
		assert_eq!(users[0].home_dir, "/home/jose");
		assert_eq!(users[1].name, "ana");
	}

	#[test]
	fn crlf_lines_are_accepted() {
		let data = "bin:x:1:daemon\r\nsys:x:3:\r\n";
		let groups = parse_groups(Cursor::new(data), "group").unwrap();
		assert_eq!(groups[0].members, vec!["daemon".to_string()]);
		assert_eq!(groups[1].gid, 3);
	}

	#[test]
	fn disabled_shells() {
		assert!(shell_disables_login(""));
		assert!(shell_disables_login("/usr/sbin/nologin"));
		assert!(shell_disables_login("/bin/false"));
		assert!(shell_disables_login("/opt/falsehood/sh"));
		assert!(!shell_disables_login("/bin/bash"));
	}

	#[test]
	fn clean_path_rules() {
		assert_eq!(clean_path(""), ".");
		assert_eq!(clean_path("/"), "/");
		assert_eq!(clean_path("/home//test/"), "/home/test");
		assert_eq!(clean_path("/home/./test/../other"), "/home/other");
		assert_eq!(clean_path("/../root"), "/root");
		assert_eq!(clean_path("a/../../b"), "../b");
		assert_eq!(clean_path("./"), ".");
	}

	#[test]
	fn open_missing_source_is_unavailable() {
		let err = open_source("/nonexistent/usrgrp/passwd", SourceKind::Passwd).unwrap_err();
		assert!(matches!(err, AccountsError::SourceUnavailable { kind: SourceKind::Passwd, .. }));
	}
}
