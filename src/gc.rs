//! Finalization and GC-root protection for boxed host objects.
//!
//! Lifetime of a boxed host object is a two-state machine: Live, then
//! Released, and Released is terminal. The transition runs either through an
//! explicit host-side release or through the collector invoking the
//! registered [`Finalizer`] once no managed box references the object. The
//! finalizer frees the host object first and overwrites the box's pointer
//! field with null immediately after; since the collector never runs
//! concurrently with host code, decoders observe the pair atomically.
//!
//! Finalizer closures are infrastructure with module lifetime, not
//! per-object garbage; registering one also appends it to the process-wide
//! [`RootSet`], which has no removal API.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::descriptor::TypeDescriptor;
use crate::heap::HostHeap;
use crate::value::PtrBox;

/// A collector-invoked release callback for one boxed host type.
///
/// Must be idempotent: running it twice, or on an already-null box, is a
/// no-op. Must not call back into the conversion layer or allocate managed
/// values; finalizers run at arbitrary points relative to host execution.
#[derive(Clone)]
pub struct Finalizer {
    f: Rc<dyn Fn(&mut HostHeap, &PtrBox)>,
}

impl Finalizer {
    /// Wrap a release callback.
    pub fn new(f: impl Fn(&mut HostHeap, &PtrBox) + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// The standard finalizer: free the host object, then null the pointer
    /// field. A null or stale box makes the whole call a no-op.
    pub fn standard() -> Self {
        Self::new(|heap, boxed| {
            let Some(handle) = boxed.handle() else {
                return;
            };
            heap.free(handle);
            boxed.clear();
        })
    }

    /// Run the finalizer against one box.
    pub fn run(&self, heap: &mut HostHeap, boxed: &PtrBox) {
        (self.f)(heap, boxed)
    }
}

impl fmt::Debug for Finalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Finalizer")
    }
}

/// Finalizers registered with the collector, one per boxed descriptor.
#[derive(Debug, Default)]
pub struct FinalizerTable {
    by_descriptor: FxHashMap<TypeDescriptor, Finalizer>,
}

impl FinalizerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a finalizer is registered for the descriptor.
    pub fn contains(&self, descriptor: TypeDescriptor) -> bool {
        self.by_descriptor.contains_key(&descriptor)
    }

    /// Register a finalizer. First registration wins; later calls for the
    /// same descriptor are ignored (registration happens on first use of a
    /// host type, which may be reached from several call thunks).
    pub fn register(&mut self, descriptor: TypeDescriptor, finalizer: Finalizer) {
        self.by_descriptor.entry(descriptor).or_insert(finalizer);
    }

    /// The finalizer for a descriptor, if one was registered.
    pub fn get(&self, descriptor: TypeDescriptor) -> Option<&Finalizer> {
        self.by_descriptor.get(&descriptor)
    }
}

/// Process-wide, append-only set of handles the collector must never reap
/// while the binding module is loaded. Holds the finalizer closures; there
/// is deliberately no removal API.
#[derive(Debug, Default)]
pub struct RootSet {
    roots: Vec<Finalizer>,
}

impl RootSet {
    /// Create an empty root set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect a finalizer closure for the life of the module.
    pub fn protect(&mut self, finalizer: Finalizer) {
        self.roots.push(finalizer);
    }

    /// Number of protected roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
