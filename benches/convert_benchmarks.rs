//! Performance benchmarks for the marshaling hot paths.
//!
//! The conversion layer sits on every cross-boundary call, so these measure
//! the per-call cost of each representation strategy:
//! - Fundamental scalars: inline slot encode/decode
//! - Bits types: raw byte-image copy
//! - Boxed objects: pointer-box encode and checked extraction

use criterion::{Criterion, criterion_group, criterion_main};
use crossbind::{Bridge, boxed_host_type, bits_host_type};
use std::hint::black_box;

#[repr(C)]
#[derive(Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
}
bits_host_type!(Point);

#[repr(C)]
#[derive(Clone, Copy)]
struct Matrix4 {
    cells: [f64; 16],
}
bits_host_type!(Matrix4);

struct Widget {
    label: String,
    weight: u32,
}
boxed_host_type!(Widget);

/// Inline scalar encode/decode, the cheapest path.
fn scalar_benchmarks(c: &mut Criterion) {
    let bridge = Bridge::new().unwrap();
    let mut group = c.benchmark_group("convert/scalar");

    group.bench_function("encode_i64", |b| {
        b.iter(|| bridge.to_managed_scalar(black_box(42i64)).unwrap());
    });

    let value = bridge.to_managed_scalar(42i64).unwrap();
    group.bench_function("decode_i64", |b| {
        b.iter(|| bridge.from_managed_scalar::<i64>(black_box(&value)).unwrap());
    });

    group.bench_function("encode_f64", |b| {
        b.iter(|| bridge.to_managed_scalar(black_box(1.5f64)).unwrap());
    });

    let boxed = bridge.to_managed_boxed_scalar(42i64).unwrap();
    group.bench_function("unbox_i64", |b| {
        b.iter(|| bridge.from_managed_scalar::<i64>(black_box(&boxed)).unwrap());
    });

    group.finish();
}

/// Byte-image copies at two payload sizes.
fn bits_benchmarks(c: &mut Criterion) {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_bits::<Point>("Point").unwrap();
    bridge.bind_bits::<Matrix4>("Matrix4").unwrap();

    let mut group = c.benchmark_group("convert/bits");

    let point = Point { x: 1.0, y: 2.0 };
    group.bench_function("encode_16_bytes", |b| {
        b.iter(|| bridge.to_managed_bits(black_box(&point)).unwrap());
    });

    let value = bridge.to_managed_bits(&point).unwrap();
    group.bench_function("decode_16_bytes", |b| {
        b.iter(|| bridge.from_managed_bits::<Point>(black_box(&value)).unwrap());
    });

    let matrix = Matrix4 { cells: [0.0; 16] };
    group.bench_function("encode_128_bytes", |b| {
        b.iter(|| bridge.to_managed_bits(black_box(&matrix)).unwrap());
    });

    let value = bridge.to_managed_bits(&matrix).unwrap();
    group.bench_function("decode_128_bytes", |b| {
        b.iter(|| bridge.from_managed_bits::<Matrix4>(black_box(&value)).unwrap());
    });

    group.finish();
}

/// Pointer-box encode plus the full checked extraction path.
fn boxed_benchmarks(c: &mut Criterion) {
    let mut bridge = Bridge::new().unwrap();
    bridge.bind_boxed::<Widget>("Widget").unwrap();

    let handle = bridge.allocate_host(Widget {
        label: "bench".into(),
        weight: 7,
    });

    let mut group = c.benchmark_group("convert/boxed");

    group.bench_function("encode_ptr_box", |b| {
        b.iter(|| bridge.to_managed_boxed::<Widget>(black_box(handle)).unwrap());
    });

    let value = bridge.to_managed_boxed::<Widget>(handle).unwrap();
    group.bench_function("extract_ref", |b| {
        b.iter(|| {
            let widget = bridge.extract_ref::<Widget>(black_box(&value)).unwrap();
            black_box(widget.weight)
        });
    });

    group.bench_function("extract_ptr", |b| {
        b.iter(|| bridge.extract_ptr::<Widget>(black_box(&value)).unwrap());
    });

    group.finish();
}

/// String round trips through the native string representation.
fn string_benchmarks(c: &mut Criterion) {
    let bridge = Bridge::new().unwrap();
    let mut group = c.benchmark_group("convert/string");

    let short = "hello";
    group.bench_function("encode_short", |b| {
        b.iter(|| bridge.to_managed_string(black_box(short)));
    });

    let long = "x".repeat(4096);
    group.bench_function("encode_4k", |b| {
        b.iter(|| bridge.to_managed_string(black_box(long.as_str())));
    });

    let value = bridge.to_managed_string(long.as_str());
    group.bench_function("decode_4k", |b| {
        b.iter(|| bridge.from_managed_string(black_box(&value)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    scalar_benchmarks,
    bits_benchmarks,
    boxed_benchmarks,
    string_benchmarks
);
criterion_main!(benches);
