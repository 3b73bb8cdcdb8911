use std::fmt;

/// Permission bitmask, bit values match the ZooKeeper wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission(u32);

impl Permission {
    pub const READ: Permission = Permission(1);
    pub const WRITE: Permission = Permission(1 << 1);
    pub const CREATE: Permission = Permission(1 << 2);
    pub const DELETE: Permission = Permission(1 << 3);
    pub const ADMIN: Permission = Permission(1 << 4);
    pub const ALL: Permission = Permission(0b11111);

    pub const fn from_bits(bits: u32) -> Self {
        Permission(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Permission) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Permission {
    type Output = Permission;

    fn bitor(self, rhs: Self) -> Self::Output {
        Permission(self.0 | rhs.0)
    }
}

/// A single access-control entry: scheme + identity + permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Acl {
    pub perms: Permission,
    pub scheme: String,
    pub id: String,
}

impl Acl {
    pub fn new(perms: Permission, scheme: impl Into<String>, id: impl Into<String>) -> Self {
        Acl {
            perms,
            scheme: scheme.into(),
            id: id.into(),
        }
    }

    /// `world:anyone` entry with the given permissions.
    pub fn world(perms: Permission) -> Self {
        Acl::new(perms, "world", "anyone")
    }

    /// Everything granted to anyone.
    pub fn open() -> Self {
        Acl::world(Permission::ALL)
    }

    pub fn is_open(&self) -> bool {
        *self == Acl::open()
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scheme, self.id, self.perms.bits())
    }
}
