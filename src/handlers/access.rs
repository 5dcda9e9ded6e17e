use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use nix::unistd::{getegid, geteuid, getgroups};

const READ: u32 = 0o4;
const EXECUTE: u32 = 0o1;
const ANY_EXECUTE: u32 = 0o111;

/// Identity the dispatcher checks file permissions against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub uid: u32,
    pub gid: u32,
    /// Supplementary groups
    pub groups: Vec<u32>,
}

impl Credentials {
    /// Effective user, group and supplementary groups of this process.
    pub fn current() -> Self {
        let groups = match getgroups() {
            Ok(groups) => groups.into_iter().map(|g| g.as_raw()).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Unable to read supplementary groups");
                Vec::new()
            }
        };

        Self {
            uid: geteuid().as_raw(),
            gid: getegid().as_raw(),
            groups,
        }
    }

    pub fn is_root(&self) -> bool {
        self.uid == 0
    }

    pub fn can_read(&self, meta: &Metadata) -> bool {
        self.is_root() || self.class_bits(meta) & READ != 0
    }

    /// Root may execute anything carrying at least one execute bit.
    pub fn can_execute(&self, meta: &Metadata) -> bool {
        if self.is_root() {
            meta.mode() & ANY_EXECUTE != 0
        } else {
            self.class_bits(meta) & EXECUTE != 0
        }
    }

    // Owner, then group, then other: the first class that matches decides,
    // even when a later class would grant more.
    fn class_bits(&self, meta: &Metadata) -> u32 {
        let mode = meta.mode();
        if meta.uid() == self.uid {
            (mode >> 6) & 0o7
        } else if meta.gid() == self.gid || self.groups.contains(&meta.gid()) {
            (mode >> 3) & 0o7
        } else {
            mode & 0o7
        }
    }
}
