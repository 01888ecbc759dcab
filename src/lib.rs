//! Bidirectional type-marshaling bridge between native host code and a
//! managed, garbage-collected dynamic runtime.
//!
//! This crate is the bridge component of a binding generator: the
//! registration front end binds host types to managed descriptors once at
//! module-load time, and generated call thunks then encode and decode values
//! across the boundary on every call.
//!
//! # Representation strategies
//!
//! Every host type is classified at compile time into one of three wire
//! strategies (see [`repr`]):
//!
//! - **Fundamental** scalars are identity-copied into the managed slot of
//!   their exact width and signedness.
//! - **Bits** types (immutable, fixed layout) are copied as raw bytes.
//! - **Boxed** types are wrapped in a managed pointer box; their lifetime is
//!   reconciled with the collector through a per-type finalizer.
//!
//! Strings are a fixed special case routed through the runtime's native
//! string representation.
//!
//! # Example
//!
//! ```
//! use crossbind::{Bridge, boxed_host_type};
//!
//! struct Widget {
//!     label: String,
//! }
//! boxed_host_type!(Widget);
//!
//! let mut bridge = Bridge::new()?;
//! bridge.bind_boxed::<Widget>("Widget")?;
//!
//! let handle = bridge.allocate_host(Widget { label: "ok".into() });
//! let value = bridge.to_managed_boxed::<Widget>(handle)?;
//! let widget: &Widget = bridge.extract_ref(&value)?;
//! assert_eq!(widget.label, "ok");
//! # Ok::<(), crossbind::BridgeError>(())
//! ```
//!
//! # Concurrency
//!
//! Single-threaded cooperative model: the collector interleaves with host
//! execution but never runs concurrently with it. The crate performs no
//! locking; multi-threaded use requires external synchronization.

pub mod bridge;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod gc;
pub mod heap;
pub mod registry;
pub mod repr;
pub mod runtime;
pub mod type_key;
pub mod value;

pub use bridge::Bridge;
pub use convert::{FromManaged, IntoManaged};
pub use descriptor::{DescriptorTraits, ManagedLayout, TypeDescriptor, TypeTable};
pub use error::{BridgeError, BridgeResult};
pub use gc::{Finalizer, RootSet};
pub use heap::{HostHandle, HostHeap};
pub use registry::TypeRegistry;
pub use repr::{BitsType, Fundamental, Marshal, Repr, ScalarKind};
pub use runtime::{ManagedRuntime, RuntimeVersion};
pub use type_key::TypeKey;
pub use value::{Managed, PtrBox, Scalar};
