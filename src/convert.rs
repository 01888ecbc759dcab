//! Encode/decode between host values and managed values.
//!
//! [`IntoManaged`] and [`FromManaged`] cover the fundamental scalars and the
//! string special case. Both directions are identity copies: a fundamental
//! encodes into the scalar slot of its exact width and signedness, and
//! decodes from that slot only. Decoding also accepts a heap-boxed scalar
//! (the unbox path), again exact-kind only — a width or signedness mismatch
//! is a programming error in the binding declaration, never coerced.
//!
//! Bits types are handled by the raw byte-copy primitives at the bottom of
//! this module; descriptor and size validation happens in the bridge before
//! bytes are touched.

use crate::error::{BridgeError, BridgeResult};
use crate::repr::BitsType;
use crate::value::{Managed, Scalar};

/// Encode a host value into a managed value.
pub trait IntoManaged {
    /// Convert this host value into its managed representation.
    fn into_managed(self) -> Managed;
}

/// Decode a host value out of a managed value.
pub trait FromManaged: Sized {
    /// Extract a host value, or fail with the reason extraction must abort.
    fn from_managed(value: &Managed) -> BridgeResult<Self>;
}

macro_rules! impl_fundamental_convert {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoManaged for $ty {
                fn into_managed(self) -> Managed {
                    Managed::Scalar(Scalar::$variant(self))
                }
            }

            impl FromManaged for $ty {
                fn from_managed(value: &Managed) -> BridgeResult<Self> {
                    match value {
                        // Inline slot: identity copy.
                        Managed::Scalar(Scalar::$variant(v)) => Ok(*v),
                        // Heap-boxed slot: unbox for the exact kind.
                        Managed::BoxedScalar {
                            value: Scalar::$variant(v),
                            ..
                        } => Ok(*v),
                        other => Err(BridgeError::TypeMismatch {
                            expected: crate::repr::ScalarKind::$variant.symbol().to_string(),
                            found: other.shape_name().to_string(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_fundamental_convert! {
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

// Strings route through the runtime's native string representation, not the
// generic pointer-box path: immutable scalars with their own managed layout.

impl IntoManaged for String {
    fn into_managed(self) -> Managed {
        Managed::Str(self)
    }
}

impl IntoManaged for &str {
    fn into_managed(self) -> Managed {
        Managed::Str(self.to_string())
    }
}

impl FromManaged for String {
    fn from_managed(value: &Managed) -> BridgeResult<Self> {
        match value {
            Managed::Str(s) => Ok(s.clone()),
            other => Err(BridgeError::TypeMismatch {
                expected: "string".to_string(),
                found: other.shape_name().to_string(),
            }),
        }
    }
}

/// Raw byte image of a bits value. The `BitsType` contract guarantees the
/// bytes are a faithful, fixed-layout copy.
pub(crate) fn bits_to_bytes<T: BitsType>(value: &T) -> Box<[u8]> {
    let ptr = value as *const T as *const u8;
    // Size is the host type's own size; the bridge has already checked it
    // against the descriptor's declared size.
    unsafe { std::slice::from_raw_parts(ptr, size_of::<T>()) }.into()
}

/// Reinterpret a managed bits payload as the host type and copy out.
/// Caller must have verified descriptor compatibility and byte length.
pub(crate) fn bits_from_bytes<T: BitsType>(bytes: &[u8]) -> T {
    debug_assert_eq!(bytes.len(), size_of::<T>());
    unsafe { std::ptr::read_unaligned(bytes.as_ptr() as *const T) }
}
