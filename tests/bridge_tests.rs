//! End-to-end scenarios exercising the full encode/decode surface.

use crossbind::{
    Bridge, BridgeError, Managed, RuntimeVersion, bits_host_type, boxed_host_type,
};

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Debug)]
struct Point {
    x: f64,
    y: f64,
}
bits_host_type!(Point);

#[derive(Debug)]
struct Widget {
    label: String,
}
boxed_host_type!(Widget);

#[derive(Debug)]
struct Gadget;
boxed_host_type!(Gadget);

// ============================================================================
// Scenario 1: fundamental scalars
// ============================================================================

#[test]
fn int64_scalar_roundtrip() {
    let bridge = Bridge::new().unwrap();
    assert!(bridge.is_bound::<i64>());

    let value = bridge.to_managed_scalar(42i64).unwrap();
    assert_eq!(bridge.from_managed_scalar::<i64>(&value).unwrap(), 42);
}

#[test]
fn all_fundamentals_roundtrip_bit_for_bit() {
    let bridge = Bridge::new().unwrap();

    macro_rules! roundtrip {
        ($ty:ty, $($v:expr),+) => {
            $(
                let original: $ty = $v;
                let managed = bridge.to_managed_scalar(original).unwrap();
                let back = bridge.from_managed_scalar::<$ty>(&managed).unwrap();
                assert_eq!(back, original);
            )+
        };
    }

    roundtrip!(bool, true, false);
    roundtrip!(i8, i8::MIN, -1, 0, i8::MAX);
    roundtrip!(i16, i16::MIN, i16::MAX);
    roundtrip!(i32, i32::MIN, i32::MAX);
    roundtrip!(i64, i64::MIN, i64::MAX);
    roundtrip!(u8, 0, u8::MAX);
    roundtrip!(u16, 0, u16::MAX);
    roundtrip!(u32, 0, u32::MAX);
    roundtrip!(u64, 0, u64::MAX);
    roundtrip!(f32, 0.0, -0.0, f32::MIN_POSITIVE, f32::INFINITY);
    roundtrip!(f64, 0.0, f64::MAX, f64::NEG_INFINITY);
}

#[test]
fn boxed_scalar_unbox_selects_exact_width_and_signedness() {
    let bridge = Bridge::new().unwrap();
    let boxed = bridge.to_managed_boxed_scalar(-5i32).unwrap();

    assert_eq!(bridge.from_managed_scalar::<i32>(&boxed).unwrap(), -5);
    assert!(bridge.from_managed_scalar::<u32>(&boxed).is_err());
    assert!(bridge.from_managed_scalar::<i64>(&boxed).is_err());
    assert!(bridge.from_managed_scalar::<f32>(&boxed).is_err());
}

// ============================================================================
// Scenario 2: immutable bits types
// ============================================================================

#[test]
fn point_bits_roundtrip() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_bits::<Point>("Point").unwrap();

    let point = Point { x: 1.0, y: 2.0 };
    let value = bridge.to_managed_bits(&point).unwrap();
    let back = bridge.from_managed_bits::<Point>(&value).unwrap();
    assert_eq!(back, point);
}

#[test]
fn bits_decode_as_unrelated_bits_type_fails() {
    #[repr(C)]
    #[derive(Clone, Copy, PartialEq, Debug)]
    struct Size2 {
        w: f64,
        h: f64,
    }
    bits_host_type!(Size2);

    let mut bridge = Bridge::new().unwrap();
    bridge.bind_bits::<Point>("Point").unwrap();
    bridge.bind_bits::<Size2>("Size2").unwrap();

    // Same byte size, different descriptor: still refused.
    let value = bridge.to_managed_bits(&Point { x: 1.0, y: 2.0 }).unwrap();
    let err = bridge.from_managed_bits::<Size2>(&value).unwrap_err();
    assert!(matches!(err, BridgeError::TypeMismatch { .. }));
}

#[test]
fn bits_pointer_extraction_is_categorically_invalid() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_bits::<Point>("Point").unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();

    let value = bridge.to_managed_bits(&Point { x: 0.0, y: 0.0 }).unwrap();
    let err = bridge.extract_ref::<Widget>(&value).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidPointerAccess(_)));
}

// ============================================================================
// Scenario 3: boxed objects, lifetime, finalization
// ============================================================================

#[test]
fn widget_release_and_finalize_protocol() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();

    // Create widget W, encode to boxes B1 and B2.
    let w = bridge.allocate_host(Widget {
        label: "w".into(),
    });
    let b1 = bridge.to_managed_boxed::<Widget>(w).unwrap();
    let b2 = bridge.to_managed_boxed::<Widget>(w).unwrap();

    // Both boxes decode to the same object before release.
    assert_eq!(bridge.extract_ref::<Widget>(&b1).unwrap().label, "w");
    assert_eq!(bridge.extract_ref::<Widget>(&b2).unwrap().label, "w");

    // Explicit host-side release.
    assert!(bridge.release(w));

    // Reference context fails, recoverably.
    let err = bridge.extract_ref::<Widget>(&b1).unwrap_err();
    assert!(matches!(err, BridgeError::ObjectAlreadyReleased(_)));
    assert!(err.is_recoverable());

    // Pointer context observes absence as null, without error.
    assert!(bridge.extract_ptr::<Widget>(&b1).unwrap().is_none());

    // Finalizer invoked on B2 afterwards is a no-op.
    bridge.finalize(&b2);
    bridge.finalize(&b2);
    assert_eq!(bridge.heap().live_count(), 0);
}

#[test]
fn collector_finalization_frees_exactly_once() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();

    let w = bridge.allocate_host(Widget {
        label: "w".into(),
    });
    let value = bridge.to_managed_boxed::<Widget>(w).unwrap();
    assert_eq!(bridge.heap().live_count(), 1);

    bridge.finalize(&value);
    assert_eq!(bridge.heap().live_count(), 0);

    // Relaxed finalizer ordering may run it again; still a no-op.
    bridge.finalize(&value);
    assert_eq!(bridge.heap().live_count(), 0);

    // The box now holds the null sentinel; decode behaves accordingly.
    assert!(bridge.extract_ptr::<Widget>(&value).unwrap().is_none());
    assert!(matches!(
        bridge.extract_ref::<Widget>(&value),
        Err(BridgeError::ObjectAlreadyReleased(_))
    ));
}

#[test]
fn encode_does_not_transfer_ownership() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();

    let w = bridge.allocate_host(Widget {
        label: "kept".into(),
    });
    {
        let _value = bridge.to_managed_boxed::<Widget>(w).unwrap();
        // The managed value goes away without finalization.
    }
    // The host object is still owned by the host side.
    assert_eq!(bridge.heap().live_count(), 1);
    assert!(bridge.release(w));
}

#[test]
fn mutation_through_one_box_is_visible_through_the_other() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();

    let w = bridge.allocate_host(Widget {
        label: "old".into(),
    });
    let b1 = bridge.to_managed_boxed::<Widget>(w).unwrap();
    let b2 = bridge.to_managed_boxed::<Widget>(w).unwrap();

    bridge.extract_mut::<Widget>(&b1).unwrap().label = "new".into();
    assert_eq!(bridge.extract_ref::<Widget>(&b2).unwrap().label, "new");
}

// ============================================================================
// Binding uniqueness and type confusion
// ============================================================================

#[test]
fn duplicate_binding_fails() {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();
    let err = bridge.bind_boxed::<Widget>("Widget").unwrap_err();
    assert!(matches!(err, BridgeError::DuplicateBinding(_)));
}

#[test]
fn distinct_bindings_never_collide() {
    let mut bridge = Bridge::new().unwrap();
    let widget_ty = bridge.bind_boxed::<Widget>("Widget").unwrap();
    let gadget_ty = bridge.bind_boxed::<Gadget>("Gadget").unwrap();
    let point_ty = bridge.bind_bits::<Point>("Point").unwrap();

    assert_ne!(widget_ty, gadget_ty);
    assert_ne!(widget_ty, point_ty);
}

#[test]
fn encode_a_decode_b_never_returns_a_value() {
    #[derive(Clone)]
    struct Sprocket;
    boxed_host_type!(Sprocket);

    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();
    bridge.bind_boxed::<Gadget>("Gadget").unwrap();
    bridge.bind_boxed::<Sprocket>("Sprocket").unwrap();

    let w = bridge.allocate_host(Widget {
        label: "w".into(),
    });
    let value = bridge.to_managed_boxed::<Widget>(w).unwrap();

    let err = bridge.extract_ref::<Gadget>(&value).unwrap_err();
    assert!(matches!(err, BridgeError::TypeMismatch { .. }));
    assert!(bridge.extract_value::<Sprocket>(&value).is_err());
}

#[test]
fn unbound_type_surfaces_at_first_use() {
    let bridge = Bridge::new().unwrap();
    let value = bridge.to_managed_scalar(1i32).unwrap();
    let err = bridge.extract_ref::<Widget>(&value).unwrap_err();
    assert!(matches!(err, BridgeError::UnboundType(_)));
}

// ============================================================================
// Strings and runtime versions
// ============================================================================

#[test]
fn string_roundtrip_through_native_representation() {
    let bridge = Bridge::new().unwrap();
    let value = bridge.to_managed_string("héllo wörld");
    assert!(matches!(value, Managed::Str(_)));
    assert_eq!(bridge.from_managed_string(&value).unwrap(), "héllo wörld");
}

#[test]
fn legacy_runtime_resolves_prefixed_symbols() {
    let bridge = Bridge::with_version(RuntimeVersion::Legacy).unwrap();
    let via_prefix = bridge.runtime().lookup_type("core.int64").unwrap();
    let direct = bridge.lookup::<i64>().unwrap();
    assert_eq!(via_prefix, direct);
}
