//! Managed-runtime type descriptors.
//!
//! A [`TypeDescriptor`] is an opaque handle into the managed runtime's type
//! system. The runtime owns the backing [`TypeTable`]; the bridge only ever
//! references descriptors, never owns them. Each entry records the symbolic
//! name, the memory layout the runtime uses for values of that type, an
//! optional base descriptor (managed-side subtyping), and trait flags.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::repr::ScalarKind;

/// Opaque handle to a managed type descriptor. Index into the runtime's
/// [`TypeTable`]; never dangling because descriptors are append-only for the
/// life of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TypeDescriptor(u32);

impl TypeDescriptor {
    /// Raw index, for diagnostics only.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Memory layout the managed runtime uses for values of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedLayout {
    /// Inline scalar slot of an exact width and signedness.
    Scalar(ScalarKind),
    /// The runtime's native string representation.
    Str,
    /// Fixed-size raw byte payload, copied by value.
    Bits { size: usize },
    /// Small composite holding one opaque pointer field (or null).
    PtrBox,
}

bitflags! {
    /// Trait flags on a managed descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DescriptorTraits: u8 {
        /// Values are immutable once constructed.
        const IMMUTABLE = 1 << 0;
        /// Plain data, safe to copy by raw bytes.
        const POD = 1 << 1;
        /// Reference semantics; values are pointer boxes.
        const REFERENCE = 1 << 2;
    }
}

/// One entry in the runtime's type table.
#[derive(Debug, Clone)]
pub struct DescriptorEntry {
    name: String,
    layout: ManagedLayout,
    base: Option<TypeDescriptor>,
    traits: DescriptorTraits,
}

impl DescriptorEntry {
    /// Symbolic name of the descriptor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value layout for this descriptor.
    pub fn layout(&self) -> ManagedLayout {
        self.layout
    }

    /// Base descriptor, if this type specializes another.
    pub fn base(&self) -> Option<TypeDescriptor> {
        self.base
    }

    /// Trait flags.
    pub fn traits(&self) -> DescriptorTraits {
        self.traits
    }
}

/// The managed runtime's type system, owned by the runtime facade.
///
/// Descriptors are created once and never removed; lookups are by symbolic
/// name. Declaration is idempotent per name: re-declaring an existing name
/// yields the existing descriptor.
#[derive(Debug, Default)]
pub struct TypeTable {
    entries: Vec<DescriptorEntry>,
    by_name: FxHashMap<String, TypeDescriptor>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type, or return the existing descriptor for the name.
    pub fn declare(&mut self, name: &str, layout: ManagedLayout) -> TypeDescriptor {
        self.declare_with(name, layout, None, Self::default_traits(layout))
    }

    /// Declare a type with an explicit base descriptor and trait flags.
    pub fn declare_with(
        &mut self,
        name: &str,
        layout: ManagedLayout,
        base: Option<TypeDescriptor>,
        traits: DescriptorTraits,
    ) -> TypeDescriptor {
        if let Some(&existing) = self.by_name.get(name) {
            return existing;
        }
        let descriptor = TypeDescriptor(self.entries.len() as u32);
        self.entries.push(DescriptorEntry {
            name: name.to_string(),
            layout,
            base,
            traits,
        });
        self.by_name.insert(name.to_string(), descriptor);
        descriptor
    }

    fn default_traits(layout: ManagedLayout) -> DescriptorTraits {
        match layout {
            ManagedLayout::Scalar(_) | ManagedLayout::Str => {
                DescriptorTraits::IMMUTABLE | DescriptorTraits::POD
            }
            ManagedLayout::Bits { .. } => DescriptorTraits::IMMUTABLE | DescriptorTraits::POD,
            ManagedLayout::PtrBox => DescriptorTraits::REFERENCE,
        }
    }

    /// Look up a descriptor by exact symbolic name.
    pub fn lookup(&self, name: &str) -> Option<TypeDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Get the entry backing a descriptor.
    pub fn entry(&self, descriptor: TypeDescriptor) -> &DescriptorEntry {
        &self.entries[descriptor.0 as usize]
    }

    /// Symbolic name of a descriptor.
    pub fn name(&self, descriptor: TypeDescriptor) -> &str {
        self.entry(descriptor).name()
    }

    /// Whether `actual` is the same descriptor as `expected`, or a
    /// specialization of it (walks the base chain).
    pub fn is_compatible(&self, actual: TypeDescriptor, expected: TypeDescriptor) -> bool {
        let mut current = Some(actual);
        while let Some(descriptor) = current {
            if descriptor == expected {
                return true;
            }
            current = self.entry(descriptor).base();
        }
        false
    }

    /// Number of declared descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no descriptors are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
