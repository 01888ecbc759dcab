//! Deterministic host-type identity.
//!
//! [`TypeKey`] is a 64-bit key identifying a host type on the native side of
//! the bridge. Two forms exist:
//!
//! - [`TypeKey::of`] derives the key from the Rust `TypeId`, which is what
//!   the registry uses: the association between a concrete host type and its
//!   managed descriptor is keyed by compile-time identity, never by runtime
//!   inspection.
//! - [`TypeKey::from_name`] hashes a symbolic name with xxh64 under a
//!   domain-mixing constant, used where a stable cross-process identity is
//!   needed (descriptor seed data, diagnostics).
//!
//! The two forms deliberately occupy different hash domains; a name key never
//! collides with a `TypeId` key by construction of the mixing constant.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into name-derived keys.
const NAME_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A 64-bit key identifying a host type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeKey(pub u64);

impl TypeKey {
    /// Empty/invalid key constant.
    pub const EMPTY: TypeKey = TypeKey(0);

    /// Key for a concrete host type, derived from its `TypeId`.
    ///
    /// Stable within one program run, which is the lifetime the registry
    /// needs: a host type's classification and binding are fixed for the
    /// life of the program.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self::of_type_id(TypeId::of::<T>())
    }

    /// Key from an already-obtained `TypeId`.
    #[inline]
    pub fn of_type_id(type_id: TypeId) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        type_id.hash(&mut hasher);
        TypeKey(hasher.finish())
    }

    /// Key from a symbolic name. Deterministic across runs and processes.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeKey(NAME_DOMAIN ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is the empty/invalid key.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({:#018x})", self.0)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
