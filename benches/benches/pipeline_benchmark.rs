//! Hot-path benchmarks: feed parsing, store writes, resampling and indicators.
//!
//! Run with: `cargo bench --package candlewatch-bench`

use candlewatch_bench::{kline_payload, synthetic_candles, synthetic_closes};
use candlewatch_lib::indicators::{ema, macd};
use candlewatch_lib::prelude::*;
use candlewatch_lib::{parse_klines, resample};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::TempDir;

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_klines");
    for count in [99_usize, 1500] {
        let payload = kline_payload(&synthetic_candles(count));
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &payload, |b, payload| {
            b.iter(|| parse_klines(black_box(payload)).unwrap());
        });
    }
    group.finish();
}

fn resample_benchmark(c: &mut Criterion) {
    let candles = synthetic_candles(8_640);
    let mut group = c.benchmark_group("resample");
    group.throughput(Throughput::Elements(candles.len() as u64));

    for interval in [Interval::Minute15, Interval::Hour1, Interval::Hour4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(interval),
            &interval,
            |b, interval| {
                b.iter(|| resample(black_box(&candles), interval.millis(), 300));
            },
        );
    }
    group.finish();
}

fn indicator_benchmark(c: &mut Criterion) {
    let closes = synthetic_closes(300);
    let mut group = c.benchmark_group("indicators");

    group.bench_function("ema_144", |b| b.iter(|| ema(black_box(&closes), 144)));
    group.bench_function("macd_12_26_9", |b| {
        b.iter(|| macd(black_box(&closes), 12, 26, 9));
    });
    group.finish();
}

fn store_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dir = TempDir::new().unwrap();
    let store = runtime
        .block_on(SqliteCandleStore::open(&StoreConfig::new(dir.path().join("bench.db"))))
        .unwrap();
    let candles = synthetic_candles(1500);

    let mut group = c.benchmark_group("sqlite");
    group.sample_size(20);
    group.throughput(Throughput::Elements(candles.len() as u64));

    group.bench_function("upsert_batch_1500", |b| {
        b.to_async(&runtime)
            .iter(|| async { store.upsert_batch("BTCUSDT", black_box(&candles)).await.unwrap() });
    });

    group.bench_function("range_latest_300", |b| {
        b.to_async(&runtime).iter(|| async {
            store
                .range("BTCUSDT", &RangeQuery::latest(300))
                .await
                .unwrap()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    parse_benchmark,
    resample_benchmark,
    indicator_benchmark,
    store_benchmark
);
criterion_main!(benches);
