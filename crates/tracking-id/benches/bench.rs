use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;
use tracking_id::{
    GenerationWorkflow, IdGenerator, IdGeneratorAsyncExt, LockTrackingIdGenerator, MemoryStore,
    Poll, SystemClock, TimeSource, TokioSleep, TrackingId, TrackingRequest, TrackingRequestParams,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). Exactly one millisecond's worth of sequence values.
const TOTAL_IDS: usize = 4096;

fn sample_request() -> TrackingRequest {
    TrackingRequest::try_from(TrackingRequestParams {
        origin_country_id: "MY".into(),
        destination_country_id: "ID".into(),
        weight: "1.234".into(),
        created_at: "2018-11-20T19:29:32+08:00".into(),
        customer_id: "de619854-b59b-425e-9db4-943979e1bd49".into(),
        customer_name: "RedBox Logistics".into(),
        customer_slug: "redbox-logistics".into(),
    })
    .unwrap()
}

/// Hot path where every poll is `Ready`.
fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock/sequential/lock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator =
                    LockTrackingIdGenerator::new(0, FixedMockTime { millis: 1 }).unwrap();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id().unwrap() {
                        Poll::Ready { id } => {
                            black_box(id);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Wall clock, backing off whenever a millisecond's sequence runs out.
fn benchmark_system_sequential_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("system/sequential/lock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        let generator = LockTrackingIdGenerator::new(0, SystemClock::default()).unwrap();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().unwrap());
            }
        });
    });

    group.finish();
}

/// One generator shared across threads.
fn benchmark_system_threaded_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("system/threaded/lock");
    let max_threads = num_cpus::get().max(1);

    for thread_count in [1, 2, 4, 8, 16].into_iter().filter(|n| *n <= max_threads) {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator =
                            Arc::new(LockTrackingIdGenerator::new(0, SystemClock::default()).unwrap());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.next_id().unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// A single async generator on one Tokio thread.
fn benchmark_system_sequential_tokio_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("system/sequential/tokio/lock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .unwrap();

        b.to_async(&rt).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = LockTrackingIdGenerator::new(0, SystemClock::default()).unwrap();
                for _ in 0..TOTAL_IDS {
                    let id = generator.try_next_id_async::<TokioSleep>().await.unwrap();
                    black_box(id);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let id = TrackingId::from_components(TrackingId::max_timestamp(), 1023, 4095);

    group.throughput(Throughput::Elements(1));
    group.bench_function("encode", |b| b.iter(|| black_box(black_box(id).encode())));

    let encoded = id.encode();
    group.bench_function("decode", |b| {
        b.iter(|| black_box(TrackingId::decode(black_box(&encoded)).unwrap()))
    });

    group.finish();
}

/// Full generate, encode, persist cycle against the in-memory store.
fn benchmark_workflow_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("workflow/memory");
    group.throughput(Throughput::Elements(1));

    group.bench_function("generate_and_persist", |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .unwrap();
        let generator = Arc::new(LockTrackingIdGenerator::new(0, SystemClock::default()).unwrap());
        let workflow = GenerationWorkflow::new(generator, Arc::new(MemoryStore::new()));
        let request = sample_request();

        b.to_async(&rt).iter(|| async {
            black_box(workflow.generate_and_persist(&request).await.unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_lock,
    // Wall clock (yielding)
    benchmark_system_sequential_lock,
    benchmark_system_threaded_lock,
    benchmark_system_sequential_tokio_lock,
    // Encoding and persistence
    benchmark_encode,
    benchmark_workflow_memory,
);
criterion_main!(benches);
