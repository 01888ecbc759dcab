//! Facade over the managed runtime's API surface.
//!
//! The bridge consumes the managed runtime as a fixed, versioned ABI:
//! descriptor creation and lookup by symbolic name, per-width scalar boxing
//! and unboxing, bits buffer allocation, string construction and access,
//! GC-root protection, and finalizer registration. [`ManagedRuntime`] is that
//! surface. Version-conditional behavior is isolated in one place,
//! [`resolve_symbol`]; nothing else in the crate may branch on the runtime
//! version.

use crate::descriptor::{ManagedLayout, TypeDescriptor, TypeTable};
use crate::gc::{Finalizer, FinalizerTable, RootSet};
use crate::heap::HostHeap;
use crate::value::{Managed, PtrBox, Scalar};

/// ABI revision of the embedded managed runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeVersion {
    /// Older runtimes expose builtin type symbols under a `core.` prefix.
    Legacy,
    /// Current runtimes use bare symbol names.
    #[default]
    Current,
}

/// Map an embedder-visible symbol to the canonical descriptor name.
///
/// The single compatibility shim: legacy embedders hand us builtin symbols
/// spelled `core.int64` where current ones say `int64`.
pub fn resolve_symbol(version: RuntimeVersion, symbol: &str) -> &str {
    match version {
        RuntimeVersion::Legacy => symbol.strip_prefix("core.").unwrap_or(symbol),
        RuntimeVersion::Current => symbol,
    }
}

/// The managed runtime's consumed API surface.
#[derive(Debug, Default)]
pub struct ManagedRuntime {
    version: RuntimeVersion,
    types: TypeTable,
    finalizers: FinalizerTable,
    roots: RootSet,
}

impl ManagedRuntime {
    /// A runtime speaking the current ABI.
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime speaking a specific ABI revision.
    pub fn with_version(version: RuntimeVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// The ABI revision in effect.
    pub fn version(&self) -> RuntimeVersion {
        self.version
    }

    // ========================================================================
    // Type descriptors
    // ========================================================================

    /// Declare a type descriptor (idempotent per name).
    pub fn declare_type(&mut self, name: &str, layout: ManagedLayout) -> TypeDescriptor {
        self.types.declare(name, layout)
    }

    /// Look up a descriptor by embedder-visible symbol, applying the
    /// version shim.
    pub fn lookup_type(&self, symbol: &str) -> Option<TypeDescriptor> {
        self.types.lookup(resolve_symbol(self.version, symbol))
    }

    /// The runtime's type table.
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Mutable access to the type table (descriptor declaration with base
    /// chains and explicit traits).
    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    // ========================================================================
    // Value primitives
    // ========================================================================

    /// Box a scalar on the managed heap. The descriptor must be the one
    /// bound for the scalar's kind; callers validate before reaching here.
    pub fn box_scalar(&self, ty: TypeDescriptor, value: Scalar) -> Managed {
        Managed::BoxedScalar { ty, value }
    }

    /// Unbox a heap-boxed scalar, exact-kind only. Inline scalars are not
    /// accepted here; identity copies never reach the unbox primitive.
    pub fn unbox_scalar(&self, value: &Managed) -> Option<Scalar> {
        match value {
            Managed::BoxedScalar { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Allocate a bits value of the given descriptor from raw bytes.
    pub fn alloc_bits(&self, ty: TypeDescriptor, bytes: &[u8]) -> Managed {
        Managed::Bits {
            ty,
            bytes: bytes.into(),
        }
    }

    /// Allocate a pointer box wrapping a host handle.
    pub fn alloc_ptr_box(&self, ty: TypeDescriptor, handle: crate::heap::HostHandle) -> Managed {
        Managed::Ptr(PtrBox::new(ty, handle))
    }

    /// Construct a managed string through the runtime's native string
    /// constructor.
    pub fn string_new(&self, value: String) -> Managed {
        Managed::Str(value)
    }

    /// Access a managed string's contents. `None` if the value is not the
    /// runtime's string representation.
    pub fn string_contents<'a>(&self, value: &'a Managed) -> Option<&'a str> {
        match value {
            Managed::Str(s) => Some(s),
            _ => None,
        }
    }

    // ========================================================================
    // GC interaction
    // ========================================================================

    /// Register a finalizer for a boxed descriptor and protect the closure
    /// as a GC root for the life of the module. First registration wins.
    pub fn register_finalizer(&mut self, ty: TypeDescriptor, finalizer: Finalizer) {
        if !self.finalizers.contains(ty) {
            self.roots.protect(finalizer.clone());
            self.finalizers.register(ty, finalizer);
        }
    }

    /// Whether a finalizer was registered for the descriptor.
    pub fn has_finalizer(&self, ty: TypeDescriptor) -> bool {
        self.finalizers.contains(ty)
    }

    /// Number of GC-protected roots.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Collector entry point: run the registered finalizer for a managed
    /// value. Non-boxed values and descriptors without a finalizer are
    /// ignored; re-finalization is a no-op by the finalizer contract.
    pub fn finalize(&self, heap: &mut HostHeap, value: &Managed) {
        let Managed::Ptr(boxed) = value else {
            return;
        };
        if let Some(finalizer) = self.finalizers.get(boxed.descriptor()) {
            finalizer.run(heap, boxed);
        }
    }
}
