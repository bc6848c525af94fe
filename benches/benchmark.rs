//! Benchmarks for the rotor engine.
//!
//! Measures machine assembly from the catalog, single-symbol encode
//! throughput, a bare stepping cascade, and encode cost as the rotor stack
//! grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use enigma_engine::historical::ENIGMA_I;
use enigma_engine::Machine;

/// Plaintext used for the sequence benchmark (26 symbols).
const BENCH_TEXT: [usize; 26] = [
    19, 7, 4, 16, 20, 8, 2, 10, 1, 17, 14, 22, 13, 5, 14, 23, 9, 20, 12, 15, 18, 14, 21, 4, 17, 3,
];

fn enigma_i() -> Machine {
    let mut machine = ENIGMA_I.machine(&["I", "II", "III"], "UKW-B").unwrap();
    for (a, b) in [(0, 1), (2, 3), (4, 5), (6, 7), (8, 9)] {
        machine.plug(a, b).unwrap();
    }
    machine
}

/// Benchmarks building a three-rotor machine from the catalog, including
/// wiring validation of every wheel.
fn bench_machine_build(c: &mut Criterion) {
    c.bench_function("machine_build", |b| {
        b.iter(|| black_box(ENIGMA_I.machine(&["I", "II", "III"], "UKW-B").unwrap()));
    });
}

/// Benchmarks `encode()` on a plugged Enigma I.
///
/// The machine is built once and keeps stepping between iterations, so
/// carries and double steps occur at their natural rate.
fn bench_encode(c: &mut Criterion) {
    let mut machine = enigma_i();

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_symbol", |b| {
        b.iter(|| machine.encode(black_box(0)).unwrap());
    });
    group.finish();

    let mut group = c.benchmark_group("encode_sequence");
    group.throughput(Throughput::Elements(BENCH_TEXT.len() as u64));
    group.bench_function("26_symbols", |b| {
        b.iter(|| machine.encode_sequence(black_box(&BENCH_TEXT), false).unwrap());
    });
    group.finish();
}

/// Benchmarks one stepping cascade without the signal path.
fn bench_turn(c: &mut Criterion) {
    let mut machine = enigma_i();
    c.bench_function("turn", |b| {
        b.iter(|| machine.turn());
    });
}

/// Benchmarks `encode()` with 1, 3, 5 and 10 rotors.
fn bench_encode_rotor_scaling(c: &mut Criterion) {
    let rotor_counts: &[usize] = &[1, 3, 5, 10];
    let names = ["I", "II", "III", "IV", "V"];

    let mut group = c.benchmark_group("encode_rotor_scaling");
    group.throughput(Throughput::Elements(1));

    for &count in rotor_counts {
        let stack: Vec<&str> = names.iter().copied().cycle().take(count).collect();
        let mut machine = ENIGMA_I.machine(&stack, "UKW-B").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| machine.encode(black_box(7)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_machine_build,
    bench_encode,
    bench_turn,
    bench_encode_rotor_scaling,
);
criterion_main!(benches);
