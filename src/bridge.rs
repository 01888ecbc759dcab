//! The public boundary-crossing facade.
//!
//! [`Bridge`] is the surface the registration front end talks to: it binds
//! host types to managed descriptors at module-load time, and thereafter
//! generated call thunks invoke the conversion entry points on every boundary
//! crossing. It owns the managed runtime facade, the type registry, and the
//! host-object heap; nothing here locks, per the single-threaded cooperative
//! model.

use std::any::{TypeId, type_name};

use crate::convert::{FromManaged, IntoManaged, bits_from_bytes, bits_to_bytes};
use crate::descriptor::{ManagedLayout, TypeDescriptor};
use crate::error::{BridgeError, BridgeResult};
use crate::extract;
use crate::gc::Finalizer;
use crate::heap::{HostHandle, HostHeap};
use crate::registry::TypeRegistry;
use crate::repr::{BitsType, Fundamental, Marshal, Repr};
use crate::runtime::{ManagedRuntime, RuntimeVersion};
use crate::value::Managed;

/// Marshaling bridge between host code and the managed runtime.
pub struct Bridge {
    runtime: ManagedRuntime,
    registry: TypeRegistry,
    heap: HostHeap,
}

impl Bridge {
    /// Create a bridge against a current-ABI runtime, with the fundamental
    /// scalar mapping pre-seeded.
    pub fn new() -> BridgeResult<Self> {
        Self::with_version(RuntimeVersion::Current)
    }

    /// Create a bridge against a specific runtime ABI revision.
    pub fn with_version(version: RuntimeVersion) -> BridgeResult<Self> {
        let mut runtime = ManagedRuntime::with_version(version);
        let mut registry = TypeRegistry::new();
        registry.seed_scalars(&mut runtime)?;
        Ok(Self {
            runtime,
            registry,
            heap: HostHeap::new(),
        })
    }

    // ========================================================================
    // Registration (module-load time)
    // ========================================================================

    /// Bind an immutable bits host type under a managed symbol. The
    /// descriptor's declared byte size is taken from the host layout.
    pub fn bind_bits<T: BitsType>(&mut self, name: &str) -> BridgeResult<TypeDescriptor> {
        let descriptor = self
            .runtime
            .declare_type(name, ManagedLayout::Bits { size: size_of::<T>() });
        self.registry.bind::<T>(self.runtime.types(), descriptor)?;
        Ok(descriptor)
    }

    /// Bind a boxed host class under a managed symbol.
    pub fn bind_boxed<T: Marshal>(&mut self, name: &str) -> BridgeResult<TypeDescriptor> {
        let descriptor = self.runtime.declare_type(name, ManagedLayout::PtrBox);
        self.registry.bind::<T>(self.runtime.types(), descriptor)?;
        Ok(descriptor)
    }

    /// The descriptor bound for a host type.
    pub fn lookup<T: 'static>(&self) -> BridgeResult<TypeDescriptor> {
        self.registry.lookup::<T>()
    }

    /// Whether a host type has been bound.
    pub fn is_bound<T: 'static>(&self) -> bool {
        self.registry.is_bound::<T>()
    }

    // ========================================================================
    // Host-side object lifetime
    // ========================================================================

    /// Place a host object on the host heap. Allocation happens before any
    /// encode; the bridge never takes ownership through an encode alone.
    pub fn allocate_host<T: 'static>(&mut self, value: T) -> HostHandle {
        self.heap.allocate(value)
    }

    /// Explicit host-side release. Every pointer box referencing the object
    /// observes the transition; a later finalizer run on any of those boxes
    /// is a no-op. Reports `false` if the object was already released.
    pub fn release(&mut self, handle: HostHandle) -> bool {
        self.heap.free(handle)
    }

    /// Collector entry point: run the registered finalizer for a managed
    /// value. Idempotent for already-released objects.
    pub fn finalize(&mut self, value: &Managed) {
        self.runtime.finalize(&mut self.heap, value);
    }

    // ========================================================================
    // Encode: host -> managed
    // ========================================================================

    /// Encode a fundamental scalar into its inline managed slot.
    pub fn to_managed_scalar<T: Fundamental + IntoManaged>(
        &self,
        value: T,
    ) -> BridgeResult<Managed> {
        // Surfaces UnboundType if the seed was bypassed.
        self.registry.lookup::<T>()?;
        Ok(value.into_managed())
    }

    /// Encode a fundamental scalar as a heap-boxed managed scalar, through
    /// the runtime's boxing primitive.
    pub fn to_managed_boxed_scalar<T: Fundamental + IntoManaged>(
        &self,
        value: T,
    ) -> BridgeResult<Managed> {
        let descriptor = self.registry.lookup::<T>()?;
        match value.into_managed() {
            Managed::Scalar(scalar) => Ok(self.runtime.box_scalar(descriptor, scalar)),
            other => Err(BridgeError::TypeMismatch {
                expected: T::KIND.symbol().to_string(),
                found: other.shape_name().to_string(),
            }),
        }
    }

    /// Encode an immutable bits value: allocate a managed value of the bound
    /// descriptor and copy the host value's raw bytes into it.
    pub fn to_managed_bits<T: BitsType>(&self, value: &T) -> BridgeResult<Managed> {
        let binding = self.registry.binding::<T>()?;
        let descriptor = binding.descriptor();
        let declared = match self.runtime.types().entry(descriptor).layout() {
            ManagedLayout::Bits { size } => size,
            _ => {
                return Err(BridgeError::TypeMismatch {
                    expected: "bits layout".to_string(),
                    found: binding.name().to_string(),
                });
            }
        };
        if declared != size_of::<T>() {
            return Err(BridgeError::SizeMismatch {
                name: binding.name().to_string(),
                host: size_of::<T>(),
                declared,
            });
        }
        Ok(self.runtime.alloc_bits(descriptor, &bits_to_bytes(value)))
    }

    /// Encode a boxed host object: wrap the handle in a fresh pointer box.
    ///
    /// Ownership of the host object is not transferred by this call; the
    /// object is released either explicitly or by the collector. The type's
    /// finalizer is registered with the GC on first use of the host type.
    pub fn to_managed_boxed<T: Marshal>(&mut self, handle: HostHandle) -> BridgeResult<Managed> {
        let binding = self.registry.binding::<T>()?;
        if binding.repr() != Repr::Boxed {
            return Err(BridgeError::TypeMismatch {
                expected: "boxed strategy".to_string(),
                found: binding.repr().name().to_string(),
            });
        }
        if handle.type_id() != TypeId::of::<T>() {
            return Err(BridgeError::TypeMismatch {
                expected: type_name::<T>().to_string(),
                found: "host object of another type".to_string(),
            });
        }
        let descriptor = binding.descriptor();
        if !self.runtime.has_finalizer(descriptor) {
            self.runtime.register_finalizer(descriptor, Finalizer::standard());
        }
        Ok(self.runtime.alloc_ptr_box(descriptor, handle))
    }

    /// Encode a string through the runtime's native string constructor.
    pub fn to_managed_string(&self, value: impl Into<String>) -> Managed {
        self.runtime.string_new(value.into())
    }

    // ========================================================================
    // Decode: managed -> host
    // ========================================================================

    /// Decode a fundamental scalar: identity copy from the inline slot, or
    /// the exact-kind unbox for heap-boxed scalars.
    pub fn from_managed_scalar<T: Fundamental + FromManaged>(
        &self,
        value: &Managed,
    ) -> BridgeResult<T> {
        self.registry.lookup::<T>()?;
        T::from_managed(value)
    }

    /// Decode an immutable bits value: verify descriptor compatibility and
    /// byte size, then reinterpret the payload as the host type.
    pub fn from_managed_bits<T: BitsType>(&self, value: &Managed) -> BridgeResult<T> {
        let binding = self.registry.binding::<T>()?;
        let expected = binding.descriptor();
        match value {
            Managed::Bits { ty, bytes } => {
                if !self.runtime.types().is_compatible(*ty, expected) {
                    return Err(BridgeError::TypeMismatch {
                        expected: binding.name().to_string(),
                        found: self.runtime.types().name(*ty).to_string(),
                    });
                }
                if bytes.len() != size_of::<T>() {
                    return Err(BridgeError::SizeMismatch {
                        name: binding.name().to_string(),
                        host: size_of::<T>(),
                        declared: bytes.len(),
                    });
                }
                Ok(bits_from_bytes(bytes))
            }
            other => Err(BridgeError::TypeMismatch {
                expected: binding.name().to_string(),
                found: other.shape_name().to_string(),
            }),
        }
    }

    /// Reference-context decode of a boxed object.
    pub fn extract_ref<T: 'static>(&self, value: &Managed) -> BridgeResult<&T> {
        extract::extract_ref::<T>(&self.registry, self.runtime.types(), &self.heap, value)
    }

    /// Mutable reference-context decode of a boxed object.
    pub fn extract_mut<T: 'static>(&mut self, value: &Managed) -> BridgeResult<&mut T> {
        extract::extract_mut::<T>(&self.registry, self.runtime.types(), &mut self.heap, value)
    }

    /// Value-context decode of a boxed object (copies out).
    pub fn extract_value<T: Clone + 'static>(&self, value: &Managed) -> BridgeResult<T> {
        extract::extract_value::<T>(&self.registry, self.runtime.types(), &self.heap, value)
    }

    /// Pointer-context decode of a boxed object; observes absence as `None`.
    pub fn extract_ptr<T: 'static>(&self, value: &Managed) -> BridgeResult<Option<HostHandle>> {
        extract::extract_ptr::<T>(&self.registry, self.runtime.types(), &self.heap, value)
    }

    /// Decode a string through the runtime's native string accessor.
    pub fn from_managed_string(&self, value: &Managed) -> BridgeResult<String> {
        self.runtime
            .string_contents(value)
            .map(str::to_string)
            .ok_or_else(|| BridgeError::TypeMismatch {
                expected: "string".to_string(),
                found: value.shape_name().to_string(),
            })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The managed runtime facade.
    pub fn runtime(&self) -> &ManagedRuntime {
        &self.runtime
    }

    /// Mutable access to the managed runtime facade (descriptor declaration
    /// with explicit base chains).
    pub fn runtime_mut(&mut self) -> &mut ManagedRuntime {
        &mut self.runtime
    }

    /// The type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The host-object heap.
    pub fn heap(&self) -> &HostHeap {
        &self.heap
    }
}
