/// Permission-bit inspection.
///
/// Flags files whose mode lets anyone write to them or that carry the
/// set-user-ID / set-group-ID bits. Checking is a pure function of the mode
/// bits; reading them from metadata is the only platform-specific part.
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs::Metadata;
use std::ops::{BitOr, BitOrAssign};

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_IWOTH: u32 = 0o0002;

/// Set of risky permission bits found on one file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PermissionFlags(u8);

impl PermissionFlags {
    pub const WORLD_WRITABLE: Self = Self(1 << 0);
    pub const SUID: Self = Self(1 << 1);
    pub const SGID: Self = Self(1 << 2);

    const LABELS: [(Self, &'static str); 3] = [
        (Self::WORLD_WRITABLE, "world-writable"),
        (Self::SUID, "setuid"),
        (Self::SGID, "setgid"),
    ];

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of distinct flags set.
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Labels of the set flags, in a fixed order.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        Self::LABELS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, label)| label)
    }
}

impl BitOr for PermissionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PermissionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for PermissionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(label)?;
        }
        Ok(())
    }
}

impl Serialize for PermissionFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.labels())
    }
}

/// Report which risky bits are set in `mode`.
///
/// All applicable flags come back together in one set.
pub fn check_permissions(mode: u32) -> PermissionFlags {
    let mut flags = PermissionFlags::empty();
    if mode & S_IWOTH != 0 {
        flags |= PermissionFlags::WORLD_WRITABLE;
    }
    if mode & S_ISUID != 0 {
        flags |= PermissionFlags::SUID;
    }
    if mode & S_ISGID != 0 {
        flags |= PermissionFlags::SGID;
    }
    flags
}

/// Raw mode bits from file metadata.
#[cfg(unix)]
pub fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

/// Non-Unix platforms have no mode bits, so nothing is ever flagged.
#[cfg(not(unix))]
pub fn mode_bits(_meta: &Metadata) -> u32 {
    0
}
