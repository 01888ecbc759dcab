//! Host-type to managed-descriptor bindings.
//!
//! One descriptor per host type, bound exactly once, never rebound or
//! unbound. All binding happens single-threaded during module
//! initialization, before any cross-boundary call is possible, so the
//! registry carries no locking.
//!
//! Lookup of an unbound type is a programming error in the registration
//! front end, surfaced at first use; it is not a recoverable runtime
//! condition.

use std::any::type_name;

use rustc_hash::FxHashMap;

use crate::descriptor::{ManagedLayout, TypeDescriptor, TypeTable};
use crate::error::{BridgeError, BridgeResult};
use crate::repr::{Fundamental, Marshal, Repr};
use crate::runtime::ManagedRuntime;
use crate::type_key::TypeKey;

/// One host-type binding.
#[derive(Debug, Clone)]
pub struct Binding {
    descriptor: TypeDescriptor,
    repr: Repr,
    name: String,
}

impl Binding {
    /// The bound managed descriptor.
    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    /// The host type's wire strategy, fixed at bind time.
    pub fn repr(&self) -> Repr {
        self.repr
    }

    /// The managed-side symbolic name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry associating each host type with its managed descriptor.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    bindings: FxHashMap<TypeKey, Binding>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a host type to a managed descriptor.
    ///
    /// Fails with `DuplicateBinding` on a second bind attempt for the same
    /// host type, and with `TypeMismatch` when the descriptor's layout
    /// disagrees with the host type's classification (a bits type bound to a
    /// pointer-box descriptor is a binding-declaration bug, and the two
    /// strategies are mutually exclusive per type).
    pub fn bind<T: Marshal>(
        &mut self,
        table: &TypeTable,
        descriptor: TypeDescriptor,
    ) -> BridgeResult<()> {
        let key = TypeKey::of::<T>();
        if self.bindings.contains_key(&key) {
            return Err(BridgeError::DuplicateBinding(type_name::<T>().to_string()));
        }

        let layout = table.entry(descriptor).layout();
        let layout_matches = match T::REPR {
            Repr::Fundamental(kind) => layout == ManagedLayout::Scalar(kind),
            Repr::Bits => matches!(layout, ManagedLayout::Bits { .. }),
            Repr::Boxed => layout == ManagedLayout::PtrBox,
        };
        if !layout_matches {
            return Err(BridgeError::TypeMismatch {
                expected: format!("{} layout for '{}'", T::REPR.name(), type_name::<T>()),
                found: table.name(descriptor).to_string(),
            });
        }

        self.bindings.insert(
            key,
            Binding {
                descriptor,
                repr: T::REPR,
                name: table.name(descriptor).to_string(),
            },
        );
        Ok(())
    }

    /// The binding for a host type. `UnboundType` if `bind` never ran.
    pub fn binding<T: 'static>(&self) -> BridgeResult<&Binding> {
        self.bindings
            .get(&TypeKey::of::<T>())
            .ok_or_else(|| BridgeError::UnboundType(type_name::<T>().to_string()))
    }

    /// The descriptor bound for a host type.
    pub fn lookup<T: 'static>(&self) -> BridgeResult<TypeDescriptor> {
        self.binding::<T>().map(Binding::descriptor)
    }

    /// Whether a host type has been bound. Used by the front end to avoid
    /// duplicate declarations.
    pub fn is_bound<T: 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeKey::of::<T>())
    }

    /// Number of bound host types.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no host types are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Seed the fixed fundamental mapping: each primitive scalar type binds
    /// to one pre-declared descriptor, and the native string descriptor is
    /// declared. This table is registry seed data, not configurable.
    pub fn seed_scalars(&mut self, runtime: &mut ManagedRuntime) -> BridgeResult<()> {
        fn seed_one<T: Fundamental>(
            registry: &mut TypeRegistry,
            runtime: &mut ManagedRuntime,
        ) -> BridgeResult<()> {
            let descriptor =
                runtime.declare_type(T::KIND.symbol(), ManagedLayout::Scalar(T::KIND));
            registry.bind::<T>(runtime.types(), descriptor)
        }

        seed_one::<bool>(self, runtime)?;
        seed_one::<i8>(self, runtime)?;
        seed_one::<i16>(self, runtime)?;
        seed_one::<i32>(self, runtime)?;
        seed_one::<i64>(self, runtime)?;
        seed_one::<u8>(self, runtime)?;
        seed_one::<u16>(self, runtime)?;
        seed_one::<u32>(self, runtime)?;
        seed_one::<u64>(self, runtime)?;
        seed_one::<f32>(self, runtime)?;
        seed_one::<f64>(self, runtime)?;

        runtime.declare_type("string", ManagedLayout::Str);
        Ok(())
    }
}
