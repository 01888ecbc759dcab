//! Tagged managed values.
//!
//! [`Managed`] is the opaque dynamic value this layer produces for and
//! consumes from the managed runtime. Fundamental and bits values carry the
//! host value's bytes directly; boxed values are a small composite holding a
//! single pointer field, which is either a live host handle or the null
//! sentinel once the object has been released. No other state is
//! representable.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::descriptor::TypeDescriptor;
use crate::heap::HostHandle;
use crate::repr::ScalarKind;

/// An inline fundamental scalar. One variant per exact width and signedness;
/// decoding never widens or reinterprets across variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// The exact kind of this scalar slot.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
        }
    }
}

/// The single pointer field of a boxed managed value.
///
/// The slot is shared (`Rc`) between the managed value and its clones so the
/// finalizer's null-overwrite is observable from every decoder holding the
/// same box. Distinct encodes of the same host object produce distinct boxes;
/// identity is not deduplicated at this layer.
#[derive(Clone)]
pub struct PtrBox {
    ty: TypeDescriptor,
    slot: Rc<Cell<Option<HostHandle>>>,
}

impl PtrBox {
    /// Wrap a host handle in a fresh box of the given descriptor.
    pub fn new(ty: TypeDescriptor, handle: HostHandle) -> Self {
        Self {
            ty,
            slot: Rc::new(Cell::new(Some(handle))),
        }
    }

    /// The managed runtime type of this box.
    pub fn descriptor(&self) -> TypeDescriptor {
        self.ty
    }

    /// Current pointer field. `None` once released.
    pub fn handle(&self) -> Option<HostHandle> {
        self.slot.get()
    }

    /// Whether the pointer field holds the null sentinel.
    pub fn is_null(&self) -> bool {
        self.slot.get().is_none()
    }

    /// Overwrite the pointer field with the null sentinel. Called by the
    /// finalizer after the host object is freed; idempotent.
    pub fn clear(&self) {
        self.slot.set(None);
    }
}

impl fmt::Debug for PtrBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PtrBox")
            .field("ty", &self.ty)
            .field("null", &self.is_null())
            .finish()
    }
}

/// A tagged value belonging to the managed runtime.
#[derive(Debug, Clone)]
pub enum Managed {
    /// Inline fundamental scalar.
    Scalar(Scalar),
    /// Heap-boxed fundamental scalar; decoding goes through the runtime's
    /// unbox primitive for the exact width and signedness.
    BoxedScalar {
        ty: TypeDescriptor,
        value: Scalar,
    },
    /// The runtime's native string value.
    Str(String),
    /// Raw byte copy of an immutable fixed-layout host value.
    Bits {
        ty: TypeDescriptor,
        bytes: Box<[u8]>,
    },
    /// Opaque pointer box for a boxed host object.
    Ptr(PtrBox),
}

impl Managed {
    /// Human-readable name of the value's shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Managed::Scalar(s) => s.kind().symbol(),
            Managed::BoxedScalar { value, .. } => value.kind().symbol(),
            Managed::Str(_) => "string",
            Managed::Bits { .. } => "bits",
            Managed::Ptr(_) => "object",
        }
    }

    /// The descriptor attached to this value, when it carries one. Inline
    /// scalars resolve their descriptor through the registry seed instead.
    pub fn descriptor(&self) -> Option<TypeDescriptor> {
        match self {
            Managed::Scalar(_) | Managed::Str(_) => None,
            Managed::BoxedScalar { ty, .. } => Some(*ty),
            Managed::Bits { ty, .. } => Some(*ty),
            Managed::Ptr(b) => Some(b.descriptor()),
        }
    }
}
