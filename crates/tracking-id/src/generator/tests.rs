use crate::{
    ConfigError, Error, IdGenerator, LockTrackingIdGenerator, Poll, SystemClock, TimeSource,
    TrackingId,
};
use std::collections::HashSet;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};
use std::thread::scope;

struct FixedTime {
    millis: u64,
}

impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// A clock the test moves by hand.
#[derive(Clone, Default)]
struct ManualTime {
    millis: Arc<AtomicU64>,
}

impl ManualTime {
    fn at(millis: u64) -> Self {
        let time = Self::default();
        time.set(millis);
        time
    }

    fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// A clock that advances one millisecond every `reads_per_tick` reads.
struct TickingTime {
    reads: AtomicU64,
    reads_per_tick: u64,
}

impl TimeSource for TickingTime {
    fn current_millis(&self) -> u64 {
        self.reads.fetch_add(1, Ordering::Relaxed) / self.reads_per_tick
    }
}

trait PollExt {
    fn unwrap_ready(self) -> TrackingId;
    fn unwrap_pending(self) -> u64;
}

impl PollExt for Poll<TrackingId> {
    fn unwrap_ready(self) -> TrackingId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_for } => yield_for,
        }
    }
}

#[test]
fn first_id_decodes_to_clock_worker_and_zero_sequence() {
    let generator = LockTrackingIdGenerator::new(5, FixedTime { millis: 123_456 }).unwrap();
    let id = generator.next_id().unwrap();

    assert_eq!(id.timestamp(), 123_456);
    assert_eq!(id.worker_id(), 5);
    assert_eq!(id.sequence(), 0);
    assert_eq!(id.to_raw(), (123_456 << 22) | (5 << 12));
}

#[test]
fn same_millisecond_increments_sequence_by_one() {
    let generator = LockTrackingIdGenerator::new(5, FixedTime { millis: 42 }).unwrap();
    let first = generator.next_id().unwrap();
    let second = generator.next_id().unwrap();

    assert_eq!(second.sequence(), first.sequence() + 1);
    assert_eq!(second.timestamp(), first.timestamp());
    assert_eq!(second.worker_id(), first.worker_id());
    assert!(second > first);
}

#[test]
fn first_id_at_time_zero_uses_sequence_zero() {
    let generator = LockTrackingIdGenerator::new(1, FixedTime { millis: 0 }).unwrap();
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 0);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn sequence_increments_within_same_tick() {
    let generator = LockTrackingIdGenerator::new(1, FixedTime { millis: 42 }).unwrap();
    let id1 = generator.try_poll_id().unwrap().unwrap_ready();
    let id2 = generator.try_poll_id().unwrap().unwrap_ready();
    let id3 = generator.try_poll_id().unwrap().unwrap_ready();

    assert_eq!(
        [id1.sequence(), id2.sequence(), id3.sequence()],
        [0, 1, 2]
    );
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn returns_pending_when_sequence_exhausted() {
    let time = ManualTime::at(42);
    let generator =
        LockTrackingIdGenerator::from_components(42, 1, TrackingId::max_sequence(), time.clone())
            .unwrap();

    assert_eq!(generator.try_poll_id().unwrap().unwrap_pending(), 1);
    // Pending leaves state untouched.
    assert_eq!(generator.try_poll_id().unwrap().unwrap_pending(), 1);

    time.set(43);
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn handles_rollover() {
    let time = ManualTime::at(42);
    let generator = LockTrackingIdGenerator::new(1, time.clone()).unwrap();

    for i in 0..=TrackingId::max_sequence() {
        let id = generator.try_poll_id().unwrap().unwrap_ready();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }
    assert_eq!(generator.try_poll_id().unwrap().unwrap_pending(), 1);

    time.set(43);
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn clock_regression_is_an_error() {
    let time = ManualTime::at(1_000);
    let generator = LockTrackingIdGenerator::new(5, time.clone()).unwrap();
    let first = generator.next_id().unwrap();

    time.set(950);
    assert_eq!(
        generator.next_id(),
        Err(Error::ClockRegression { delta_ms: 50 })
    );

    // State is unchanged, so the generator resumes once the clock catches up.
    time.set(1_000);
    let resumed = generator.next_id().unwrap();
    assert_eq!(resumed.timestamp(), 1_000);
    assert_eq!(resumed.sequence(), first.sequence() + 1);
}

#[test]
fn rejects_worker_id_out_of_range() {
    assert_eq!(
        LockTrackingIdGenerator::new(1024, FixedTime { millis: 0 }).err(),
        Some(ConfigError::WorkerIdOutOfRange {
            worker_id: 1024,
            max: 1023
        })
    );
    assert!(
        LockTrackingIdGenerator::from_components(0, 4096, 0, FixedTime { millis: 0 }).is_err()
    );
    let generator = LockTrackingIdGenerator::new(1023, FixedTime { millis: 0 }).unwrap();
    assert_eq!(generator.worker_id(), 1023);
}

#[test]
fn rejects_timestamp_past_field_width() {
    let millis = TrackingId::max_timestamp() + 1;
    let generator = LockTrackingIdGenerator::new(0, FixedTime { millis }).unwrap();
    assert_eq!(
        generator.try_poll_id(),
        Err(Error::TimestampOverflow { millis })
    );
}

#[test]
fn next_id_waits_for_next_millisecond() {
    let generator = LockTrackingIdGenerator::new(
        3,
        TickingTime {
            reads: AtomicU64::new(0),
            reads_per_tick: 4_200,
        },
    )
    .unwrap();

    let mut last = generator.next_id().unwrap();
    for _ in 0..20_000 {
        let id = generator.next_id().unwrap();
        assert!(id > last);
        last = id;
    }
    assert!(last.timestamp() >= 4);
}

#[test]
fn try_next_id_calls_backoff_while_pending() {
    let generator = LockTrackingIdGenerator::from_components(
        0,
        1,
        TrackingId::max_sequence(),
        TickingTime {
            reads: AtomicU64::new(0),
            reads_per_tick: 3,
        },
    )
    .unwrap();

    let mut waits = Vec::new();
    let id = generator.try_next_id(|yield_for| waits.push(yield_for)).unwrap();
    assert_eq!(waits, vec![1, 1, 1]);
    assert_eq!(id.timestamp(), 1);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn monotonic_with_system_clock() {
    const TOTAL_IDS: usize = 4096 * 64;

    let generator = LockTrackingIdGenerator::new(1, SystemClock::default()).unwrap();
    let mut last = generator.next_id().unwrap();

    for _ in 0..TOTAL_IDS {
        let id = generator.next_id().unwrap();
        assert!(id.timestamp() >= last.timestamp());
        if id.timestamp() == last.timestamp() {
            assert_eq!(id.sequence(), last.sequence() + 1);
        } else {
            assert_eq!(id.sequence(), 0);
        }
        assert_eq!(id.worker_id(), 1);
        last = id;
    }
}

#[test]
fn unique_across_threads() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 4096 * 8;

    let generator = Arc::new(LockTrackingIdGenerator::new(7, SystemClock::default()).unwrap());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut local = Vec::with_capacity(IDS_PER_THREAD);
                for _ in 0..IDS_PER_THREAD {
                    local.push(generator.next_id().unwrap());
                }
                let mut seen = seen_ids.lock().unwrap();
                for id in local {
                    assert!(seen.insert(id), "duplicate id {id}");
                }
            });
        }
    });

    assert_eq!(seen_ids.lock().unwrap().len(), THREADS * IDS_PER_THREAD);
}
