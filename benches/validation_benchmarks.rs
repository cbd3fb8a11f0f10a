use std::hint::black_box;

use cardform::card::CardTypeRegistry;
use cardform::form::{Clock, Field, FormEngine};
use cardform::validation::{format_card_number, luhn_check, YearMonth};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Card numbers of every built-in issuer plus an unknown one
fn sample_numbers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("visa", "4532015112830366"),
        ("mastercard", "5555555555554444"),
        ("amex", "378282246310005"),
        ("discover", "6011111111111117"),
        ("dinersclub", "30569309025904"),
        ("jcb", "3530111333300000"),
        ("unknown", "9999999999999999999"),
    ]
}

/// Benchmark the checksum alone
fn bench_luhn(c: &mut Criterion) {
    let mut group = c.benchmark_group("luhn");

    for (issuer, number) in sample_numbers() {
        group.throughput(Throughput::Elements(number.len() as u64));
        group.bench_with_input(BenchmarkId::new("issuer", issuer), number, |b, number| {
            b.iter(|| black_box(luhn_check(black_box(number))))
        });
    }

    group.finish();
}

/// Benchmark detection plus formatting, the work done per number keystroke
fn bench_detect_and_format(c: &mut Criterion) {
    let registry = CardTypeRegistry::builtin();
    let mut group = c.benchmark_group("detect_and_format");

    for (issuer, number) in sample_numbers() {
        group.bench_with_input(BenchmarkId::new("issuer", issuer), number, |b, number| {
            b.iter(|| {
                let rule = registry.detect(black_box(number));
                black_box(format_card_number(number, rule))
            })
        });
    }

    group.finish();
}

/// Benchmark a full reducer pass while typing a number digit by digit
fn bench_typing_session(c: &mut Criterion) {
    let engine = FormEngine::new(CardTypeRegistry::builtin())
        .with_clock(Clock::Fixed(YearMonth::new(2026, 10)));
    let mut group = c.benchmark_group("typing_session");

    for (issuer, number) in sample_numbers() {
        let prefixes: Vec<&str> = (1..=number.len()).map(|n| &number[..n]).collect();

        group.throughput(Throughput::Elements(prefixes.len() as u64));
        group.bench_with_input(BenchmarkId::new("issuer", issuer), &prefixes, |b, prefixes| {
            b.iter(|| {
                let mut state = engine.reset();
                for prefix in prefixes {
                    state = engine.on_field_change(&state, Field::Number, black_box(prefix));
                }
                black_box(state)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_luhn,
    bench_detect_and_format,
    bench_typing_session
);
criterion_main!(benches);
