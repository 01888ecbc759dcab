//! Checked extraction of host objects from managed values.
//!
//! This is the single narrow primitive through which a managed value's
//! pointer field is reinterpreted as a host object. Every path verifies, in
//! order:
//!
//! 1. the managed value is a pointer box at all (bits values fail with the
//!    distinct `InvalidPointerAccess`),
//! 2. the box's runtime descriptor is the bound descriptor for the expected
//!    host type, or a specialization of it,
//! 3. the host-side type identity matches (handle `TypeId` check),
//! 4. the pointer field is non-null and the handle still live.
//!
//! A failure at steps 1–3 is fatal type confusion and aborts extraction.
//! Step 4 depends on the access mode: reference and value contexts fail with
//! `ObjectAlreadyReleased`, while pointer context observes absence as `None`.

use std::any::{TypeId, type_name};

use crate::descriptor::TypeTable;
use crate::error::{BridgeError, BridgeResult};
use crate::heap::{HostHandle, HostHeap};
use crate::registry::TypeRegistry;
use crate::value::{Managed, PtrBox};

/// Resolve the pointer box inside `value` and verify both the managed-side
/// descriptor and the host-side type identity for `T`.
fn checked_box<'a, T: 'static>(
    registry: &TypeRegistry,
    types: &TypeTable,
    value: &'a Managed,
) -> BridgeResult<&'a PtrBox> {
    let expected = registry.lookup::<T>()?;

    let boxed = match value {
        Managed::Ptr(boxed) => boxed,
        Managed::Bits { ty, .. } => {
            return Err(BridgeError::InvalidPointerAccess(types.name(*ty).to_string()));
        }
        other => {
            return Err(BridgeError::TypeMismatch {
                expected: types.name(expected).to_string(),
                found: other.shape_name().to_string(),
            });
        }
    };

    if !types.is_compatible(boxed.descriptor(), expected) {
        return Err(BridgeError::TypeMismatch {
            expected: types.name(expected).to_string(),
            found: types.name(boxed.descriptor()).to_string(),
        });
    }

    if let Some(handle) = boxed.handle()
        && handle.type_id() != TypeId::of::<T>()
    {
        return Err(BridgeError::TypeMismatch {
            expected: type_name::<T>().to_string(),
            found: types.name(boxed.descriptor()).to_string(),
        });
    }

    Ok(boxed)
}

fn live_handle<T: 'static>(
    registry: &TypeRegistry,
    types: &TypeTable,
    heap: &HostHeap,
    value: &Managed,
) -> BridgeResult<HostHandle> {
    let boxed = checked_box::<T>(registry, types, value)?;
    let released = || BridgeError::ObjectAlreadyReleased(types.name(boxed.descriptor()).to_string());
    let handle = boxed.handle().ok_or_else(released)?;
    if !heap.is_live(handle) {
        return Err(released());
    }
    Ok(handle)
}

/// Reference-context decode: borrow the live host object.
pub fn extract_ref<'a, T: 'static>(
    registry: &TypeRegistry,
    types: &TypeTable,
    heap: &'a HostHeap,
    value: &Managed,
) -> BridgeResult<&'a T> {
    let handle = live_handle::<T>(registry, types, heap, value)?;
    heap.get::<T>(handle)
        .ok_or_else(|| BridgeError::ObjectAlreadyReleased(type_name::<T>().to_string()))
}

/// Mutable reference-context decode.
pub fn extract_mut<'a, T: 'static>(
    registry: &TypeRegistry,
    types: &TypeTable,
    heap: &'a mut HostHeap,
    value: &Managed,
) -> BridgeResult<&'a mut T> {
    let handle = live_handle::<T>(registry, types, heap, value)?;
    heap.get_mut::<T>(handle)
        .ok_or_else(|| BridgeError::ObjectAlreadyReleased(type_name::<T>().to_string()))
}

/// Value-context decode: copy the live host object out.
pub fn extract_value<T: Clone + 'static>(
    registry: &TypeRegistry,
    types: &TypeTable,
    heap: &HostHeap,
    value: &Managed,
) -> BridgeResult<T> {
    extract_ref::<T>(registry, types, heap, value).cloned()
}

/// Pointer-context decode: the one mode allowed to observe absence. A null
/// or stale pointer field yields `Ok(None)` instead of an error.
pub fn extract_ptr<T: 'static>(
    registry: &TypeRegistry,
    types: &TypeTable,
    heap: &HostHeap,
    value: &Managed,
) -> BridgeResult<Option<HostHandle>> {
    let boxed = checked_box::<T>(registry, types, value)?;
    match boxed.handle() {
        Some(handle) if heap.is_live(handle) => Ok(Some(handle)),
        _ => Ok(None),
    }
}
