//! Arena for heap-allocated host objects exposed to the managed runtime.
//!
//! Host objects handed across the boundary live here behind generational
//! handles. Freeing a slot bumps its generation, so every handle taken before
//! the free goes stale at once; a stale handle can be detected but never
//! dereferenced. This is what makes an explicit host-side release observable
//! through every pointer box referencing the object, and what makes a second
//! finalizer run structurally a no-op instead of a double free.

use std::any::{Any, TypeId};
use std::fmt;

/// Handle to a host object in the [`HostHeap`].
///
/// Copyable and safe: the generational index detects use-after-free, and the
/// recorded `TypeId` backs the host-side downcast check on extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostHandle {
    index: u32,
    generation: u32,
    type_id: TypeId,
}

impl HostHandle {
    /// The Rust type of the object this handle was created for.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

struct HeapSlot {
    generation: u32,
    value: Option<Box<dyn Any>>,
}

/// Storage for host objects referenced from managed pointer boxes.
///
/// Objects are allocated by host code before they are ever encoded; the heap
/// does not reference-count and does not deduplicate. State per object is
/// exactly live or released, nothing in between.
#[derive(Default)]
pub struct HostHeap {
    slots: Vec<HeapSlot>,
    free_list: Vec<u32>,
}

impl HostHeap {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a host object and return its handle.
    pub fn allocate<T: Any>(&mut self, value: T) -> HostHandle {
        let type_id = TypeId::of::<T>();
        let boxed: Box<dyn Any> = Box::new(value);

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(boxed);
            HostHandle {
                index,
                generation: slot.generation,
                type_id,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(HeapSlot {
                generation: 0,
                value: Some(boxed),
            });
            HostHandle {
                index,
                generation: 0,
                type_id,
            }
        }
    }

    /// Immutable access. `None` if the handle is stale or the type differs.
    pub fn get<T: Any>(&self, handle: HostHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()?.downcast_ref::<T>()
    }

    /// Mutable access. `None` if the handle is stale or the type differs.
    pub fn get_mut<T: Any>(&mut self, handle: HostHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()?.downcast_mut::<T>()
    }

    /// Whether the handle still refers to a live object.
    pub fn is_live(&self, handle: HostHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.value.is_some())
    }

    /// Free the object behind the handle. Idempotent: freeing an already
    /// stale handle does nothing and reports `false`.
    ///
    /// Dropping the boxed value runs the host type's destructor; the
    /// generation bump happens in the same call, so no observer can see a
    /// freed-but-live state.
    pub fn free(&mut self, handle: HostHandle) -> bool {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.value.is_some()
        {
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(handle.index);
            return true;
        }
        false
    }

    /// Number of live objects.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }
}

impl fmt::Debug for HostHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHeap")
            .field("slot_count", &self.slots.len())
            .field("free_count", &self.free_list.len())
            .finish()
    }
}
