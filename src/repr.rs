//! Representation classification for host types.
//!
//! Every host type crossing the boundary is classified into exactly one of
//! three wire strategies, decided at compile time through trait impls and
//! never re-derived at runtime:
//!
//! - **Fundamental** — primitive numeric/boolean scalars, copied by value
//!   into the managed scalar slot matching their exact width and signedness.
//! - **Bits** — fixed-layout immutable aggregates with no GC-visible interior
//!   pointers, copied as raw bytes.
//! - **Boxed** — everything else; wrapped in a managed pointer box whose
//!   lifetime is reconciled with the collector through a finalizer.
//!
//! Trait coherence gives the exclusivity invariant for free: a type can carry
//! only one [`Marshal`] impl, so it cannot be both bits and boxed.

/// Exact kind of a fundamental scalar slot.
///
/// Width and signedness are part of the identity; decoding must select the
/// unbox operation matching them exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Canonical managed-side symbol for this scalar's descriptor.
    pub fn symbol(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "int8",
            ScalarKind::I16 => "int16",
            ScalarKind::I32 => "int32",
            ScalarKind::I64 => "int64",
            ScalarKind::U8 => "uint8",
            ScalarKind::U16 => "uint16",
            ScalarKind::U32 => "uint32",
            ScalarKind::U64 => "uint64",
            ScalarKind::F32 => "float32",
            ScalarKind::F64 => "float64",
        }
    }

    /// Slot width in bits.
    pub fn width_bits(self) -> u32 {
        match self {
            ScalarKind::Bool | ScalarKind::I8 | ScalarKind::U8 => 8,
            ScalarKind::I16 | ScalarKind::U16 => 16,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 32,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 64,
        }
    }

    /// Whether this is a signed integer kind.
    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64
        )
    }

    /// All scalar kinds, in seed-registration order.
    pub const ALL: [ScalarKind; 11] = [
        ScalarKind::Bool,
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
    ];
}

/// Wire strategy for a host type. Closed set, fixed per type for the life
/// of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    /// Primitive scalar, identity-copied into the matching managed slot.
    Fundamental(ScalarKind),
    /// Fixed-layout immutable value, copied as raw bytes.
    Bits,
    /// Opaque pointer box with finalizer-managed lifetime.
    Boxed,
}

impl Repr {
    /// Short name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Repr::Fundamental(_) => "fundamental",
            Repr::Bits => "bits",
            Repr::Boxed => "boxed",
        }
    }
}

/// Compile-time classifier: associates a host type with its wire strategy.
///
/// Implemented by the fundamental impls below, by [`bits_host_type!`], and by
/// [`boxed_host_type!`]. User-defined classes default to the boxed strategy;
/// opting into bits is an explicit declaration.
pub trait Marshal: 'static {
    /// The wire strategy for this host type.
    const REPR: Repr;
}

/// Primitive scalar host types.
///
/// The `KIND` constant pins the exact managed slot; conversions are identity
/// copies in both directions.
pub trait Fundamental: Marshal + Copy + 'static {
    /// Exact scalar slot for this type.
    const KIND: ScalarKind;
}

/// Marker for fixed-layout immutable value types marshaled as raw bytes.
///
/// # Safety
///
/// Implementors assert that the type has a fixed memory layout (`#[repr(C)]`
/// or equivalent), is plain old data (`Copy`, no drop glue), and contains no
/// pointers the managed collector would need visibility into. A violating
/// impl lets the bits strategy copy bytes that do not round-trip.
pub unsafe trait BitsType: Marshal + Copy + 'static {}

macro_rules! impl_fundamental {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Marshal for $ty {
                const REPR: Repr = Repr::Fundamental(ScalarKind::$kind);
            }

            impl Fundamental for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;
            }
        )*
    };
}

impl_fundamental! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

/// Declare a host type as an immutable bits type.
///
/// The type must be `Copy` with a fixed layout; see the safety contract on
/// [`BitsType`].
///
/// ```
/// use crossbind::bits_host_type;
///
/// #[repr(C)]
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// bits_host_type!(Point);
/// ```
#[macro_export]
macro_rules! bits_host_type {
    ($ty:ty) => {
        impl $crate::repr::Marshal for $ty {
            const REPR: $crate::repr::Repr = $crate::repr::Repr::Bits;
        }

        unsafe impl $crate::repr::BitsType for $ty {}
    };
}

/// Declare a host type as a boxed class. This is the default strategy for
/// user-defined types exposed by reference.
///
/// ```
/// use crossbind::boxed_host_type;
///
/// struct Widget {
///     label: String,
/// }
///
/// boxed_host_type!(Widget);
/// ```
#[macro_export]
macro_rules! boxed_host_type {
    ($ty:ty) => {
        impl $crate::repr::Marshal for $ty {
            const REPR: $crate::repr::Repr = $crate::repr::Repr::Boxed;
        }
    };
}
