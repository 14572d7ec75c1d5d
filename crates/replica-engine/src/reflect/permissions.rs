//! Reflection Security & Permissions
//!
//! Reflective access to fields and constructors goes through an [`Accessor`]
//! holding [`ReflectionPermission`] flags. Public members need the `*_PUBLIC`
//! flag, private and protected members the `*_PRIVATE` flag. Permissions
//! resolve class-level first, then fall back to the accessor's global set.
//!
//! ## TOML Configuration
//!
//! The engine's accessor can be configured in the clone config:
//!
//! ```toml
//! [clone]
//! permissions = "READ_PUBLIC|WRITE_PUBLIC|INVOKE_PUBLIC"
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::reflect::{ClassId, Visibility};

/// Reflection permission flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReflectionPermission(u8);

impl ReflectionPermission {
    /// No reflection allowed
    pub const NONE: Self = Self(0x00);
    /// Read public fields
    pub const READ_PUBLIC: Self = Self(0x01);
    /// Read private fields
    pub const READ_PRIVATE: Self = Self(0x02);
    /// Write public fields
    pub const WRITE_PUBLIC: Self = Self(0x04);
    /// Write private fields
    pub const WRITE_PRIVATE: Self = Self(0x08);
    /// Invoke public constructors
    pub const INVOKE_PUBLIC: Self = Self(0x10);
    /// Invoke private constructors
    pub const INVOKE_PRIVATE: Self = Self(0x20);

    // Common combinations
    /// READ_PUBLIC | READ_PRIVATE
    pub const READ_ALL: Self = Self(0x03);
    /// WRITE_PUBLIC | WRITE_PRIVATE
    pub const WRITE_ALL: Self = Self(0x0C);
    /// INVOKE_PUBLIC | INVOKE_PRIVATE
    pub const INVOKE_ALL: Self = Self(0x30);
    /// READ_PUBLIC | WRITE_PUBLIC | INVOKE_PUBLIC
    pub const PUBLIC_ONLY: Self = Self(0x15);
    /// All read/write/invoke
    pub const FULL_ACCESS: Self = Self(0x3F);

    const NAMED: [(&'static str, Self); 13] = [
        ("NONE", Self::NONE),
        ("READ_PUBLIC", Self::READ_PUBLIC),
        ("READ_PRIVATE", Self::READ_PRIVATE),
        ("WRITE_PUBLIC", Self::WRITE_PUBLIC),
        ("WRITE_PRIVATE", Self::WRITE_PRIVATE),
        ("INVOKE_PUBLIC", Self::INVOKE_PUBLIC),
        ("INVOKE_PRIVATE", Self::INVOKE_PRIVATE),
        ("READ_ALL", Self::READ_ALL),
        ("WRITE_ALL", Self::WRITE_ALL),
        ("INVOKE_ALL", Self::INVOKE_ALL),
        ("PUBLIC_ONLY", Self::PUBLIC_ONLY),
        ("FULL_ACCESS", Self::FULL_ACCESS),
        ("ALL", Self::FULL_ACCESS),
    ];

    /// Create from raw bits (unknown bits are dropped)
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::FULL_ACCESS.0)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if permission contains a flag
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of permissions
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Intersection of permissions
    pub const fn intersection(&self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Difference (remove flags)
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    fn parse_single(s: &str) -> Option<Self> {
        let upper = s.to_uppercase();
        if let Some((_, perm)) = Self::NAMED.iter().find(|(name, _)| *name == upper) {
            return Some(*perm);
        }
        // Hex or decimal
        if let Some(hex) = s.strip_prefix("0x") {
            u8::from_str_radix(hex, 16).ok().map(Self::from_bits)
        } else {
            s.parse::<u8>().ok().map(Self::from_bits)
        }
    }
}

impl Default for ReflectionPermission {
    fn default() -> Self {
        Self::FULL_ACCESS
    }
}

/// Unrecognized permission string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid permission value: {0}")]
pub struct ParsePermissionError(pub String);

impl FromStr for ReflectionPermission {
    type Err = ParsePermissionError;

    /// Parse combined flags from a pipe-separated string (e.g. `READ_PUBLIC|WRITE_PUBLIC`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Self::NONE;
        for part in s.split('|') {
            let perm = Self::parse_single(part.trim())
                .ok_or_else(|| ParsePermissionError(s.to_string()))?;
            result = result.union(perm);
        }
        Ok(result)
    }
}

impl fmt::Display for ReflectionPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Named combination first, then the individual flags
        if let Some((name, _)) = Self::NAMED.iter().find(|(_, perm)| perm == self) {
            return write!(f, "{}", name);
        }
        let parts: Vec<&str> = Self::NAMED[1..7]
            .iter()
            .filter(|(_, perm)| self.contains(*perm))
            .map(|(name, _)| *name)
            .collect();
        write!(f, "{}", parts.join("|"))
    }
}

impl TryFrom<String> for ReflectionPermission {
    type Error = ParsePermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReflectionPermission> for String {
    fn from(value: ReflectionPermission) -> Self {
        value.to_string()
    }
}

/// Capability for reflective member access
///
/// The default accessor holds `FULL_ACCESS` and so reaches private fields
/// and constructors.
#[derive(Debug, Clone, Default)]
pub struct Accessor {
    /// Global permissions
    permissions: ReflectionPermission,
    /// Class-level overrides
    class_permissions: FxHashMap<ClassId, ReflectionPermission>,
}

impl Accessor {
    /// Accessor with full read/write/invoke rights
    pub fn privileged() -> Self {
        Self::with_permissions(ReflectionPermission::FULL_ACCESS)
    }

    /// Accessor restricted to public members
    pub fn public_only() -> Self {
        Self::with_permissions(ReflectionPermission::PUBLIC_ONLY)
    }

    /// Accessor with the given global permissions
    pub fn with_permissions(permissions: ReflectionPermission) -> Self {
        Self {
            permissions,
            class_permissions: FxHashMap::default(),
        }
    }

    /// Override permissions for members declared on one class
    pub fn with_class_permissions(mut self, class_id: ClassId, permissions: ReflectionPermission) -> Self {
        self.class_permissions.insert(class_id, permissions);
        self
    }

    /// Global permissions
    pub fn permissions(&self) -> ReflectionPermission {
        self.permissions
    }

    /// Resolve permissions for members declared on a class
    pub fn resolve(&self, class_id: ClassId) -> ReflectionPermission {
        self.class_permissions
            .get(&class_id)
            .copied()
            .unwrap_or(self.permissions)
    }

    fn check(
        &self,
        class_id: ClassId,
        visibility: Visibility,
        public: ReflectionPermission,
        private: ReflectionPermission,
    ) -> bool {
        let required = if visibility.is_restricted() { private } else { public };
        self.resolve(class_id).contains(required)
    }

    /// Check field read permission
    pub fn can_read(&self, class_id: ClassId, visibility: Visibility) -> bool {
        self.check(
            class_id,
            visibility,
            ReflectionPermission::READ_PUBLIC,
            ReflectionPermission::READ_PRIVATE,
        )
    }

    /// Check field write permission
    pub fn can_write(&self, class_id: ClassId, visibility: Visibility) -> bool {
        self.check(
            class_id,
            visibility,
            ReflectionPermission::WRITE_PUBLIC,
            ReflectionPermission::WRITE_PRIVATE,
        )
    }

    /// Check constructor invocation permission
    pub fn can_invoke(&self, class_id: ClassId, visibility: Visibility) -> bool {
        self.check(
            class_id,
            visibility,
            ReflectionPermission::INVOKE_PUBLIC,
            ReflectionPermission::INVOKE_PRIVATE,
        )
    }
}
