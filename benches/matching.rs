//! Benchmarks for the matching core.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench -- run_pass
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use market_core::{Order, OrderBook};

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

/// 10.00000000
const BASE_PRICE: u64 = 1_000_000_000;

/// 0.00100000
const TICK: u64 = 100_000;

/// Resting asks at increasing prices, one per tick above `BASE_PRICE`
fn populate_asks(book: &mut OrderBook, count: usize, shares: u64) {
    for i in 0..count {
        let price = BASE_PRICE + i as u64 * TICK;
        book.add(Order::sell_limit("ask-maker", i as u64, shares, price)).unwrap();
    }
}

/// Resting bids at decreasing prices, one per tick below `BASE_PRICE`
fn populate_bids(book: &mut OrderBook, count: usize, shares: u64) {
    for i in 0..count {
        let price = BASE_PRICE - (i as u64 + 1) * TICK;
        book.add(Order::buy_limit("bid-maker", i as u64, shares, price)).unwrap();
    }
}

/// Alternating buys and sells around the base price, seeded
fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let offset: i64 = rng.gen_range(-50i64..=50) * TICK as i64;
            let price = (BASE_PRICE as i64 + offset) as u64;
            let shares = rng.gen_range(1..=500);
            if i % 2 == 0 {
                Order::buy_limit("taker", i as u64, shares, price)
            } else {
                Order::sell_limit("taker", i as u64, shares, price)
            }
        })
        .collect()
}

// ============================================================================
// BENCHMARK: add
// ============================================================================

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("to_empty_book", |b| {
        b.iter_batched(
            OrderBook::new,
            |mut book| {
                black_box(book.add(Order::buy_limit("taker", 0, 100, BASE_PRICE)))
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("to_1k_book", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity(2_000);
                populate_asks(&mut book, 500, 100);
                populate_bids(&mut book, 500, 100);
                book
            },
            |mut book| {
                black_box(book.add(Order::buy_limit("taker", 0, 100, BASE_PRICE - 100 * TICK)))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: run
// ============================================================================

fn bench_run_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_pass");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("single_cross_1k_book", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity(2_000);
                populate_asks(&mut book, 1_000, 100);
                book.add(Order::buy_market("taker", 0, 100)).unwrap();
                book
            },
            |mut book| {
                book.run();
                black_box(book.len())
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("sweep_100_levels", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity(200);
                populate_asks(&mut book, 100, 10);
                book.add(Order::buy_market("taker", 0, 1_000)).unwrap();
                book
            },
            |mut book| {
                book.run();
                black_box(book.match_count())
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("no_cross", |b| {
        let mut book = OrderBook::with_capacity(2_000);
        populate_asks(&mut book, 1_000, 100);
        populate_bids(&mut book, 1_000, 100);
        b.iter(|| {
            book.run();
            black_box(book.match_count())
        });
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::new("add_then_run", batch_size), &batch_size, |b, &size| {
            let orders = generate_order_batch(size, 42);
            b.iter_batched(
                || (OrderBook::with_capacity(size), orders.clone()),
                |(mut book, orders)| {
                    for order in orders {
                        black_box(book.add(order)).ok();
                        book.run();
                    }
                    book.len()
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(benches, bench_add, bench_run_pass, bench_throughput);

criterion_main!(benches);
