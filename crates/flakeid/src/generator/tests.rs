use crate::{
    Error, GeneratorBuilder, SnowflakeGenerator, SnowflakeId, SystemClock, TimeSource,
    new_256_with_node, new_1024_with_node, new_4096_with_node,
};
use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::{vec, vec::Vec};
use core::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::thread::scope;

#[derive(Clone)]
struct MockTime {
    millis: i64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl SharedMockStepTime {
    fn new(values: Vec<i64>) -> Self {
        Self {
            clock: Rc::new(MockStepTime {
                values,
                index: Cell::new(0),
            }),
        }
    }

    fn step(&self) {
        self.clock.index.set(self.clock.index.get() + 1);
    }
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> i64 {
        self.clock.values[self.clock.index.get()]
    }
}

struct MockStepTime {
    values: Vec<i64>,
    index: Cell<usize>,
}

fn mock_builder<T: TimeSource>(time: T) -> GeneratorBuilder<T> {
    GeneratorBuilder::new()
        .ignore_environment()
        .with_epoch_millis(0)
        .with_clock(time)
}

fn run_counter_increments_within_same_tick<G: SnowflakeGenerator>(generator: &G) {
    let id1 = generator.create();
    let id2 = generator.create();
    let id3 = generator.create();

    let bits = generator.config().node_bits();
    assert_eq!(id1.time_field(), 42);
    assert_eq!(id2.time_field(), 42);
    assert_eq!(id3.time_field(), 42);
    assert_eq!(id1.counter(bits), 0);
    assert_eq!(id2.counter(bits), 1);
    assert_eq!(id3.counter(bits), 2);
    assert_eq!(id1.node(bits), 1);
    assert!(id1 < id2 && id2 < id3);
}

/// Expects a 2-bit counter reseeded to 3 and a clock stepping 42, 43, 50.
fn run_counter_overflow_advances_time<G: SnowflakeGenerator>(
    generator: &G,
    shared_time: &SharedMockStepTime,
) {
    let bits = generator.config().node_bits();
    let fields = |id: SnowflakeId| (id.time_field(), id.counter(bits));

    assert_eq!(fields(generator.create()), (42, 3));
    assert_eq!(fields(generator.create()), (43, 0));
    assert_eq!(fields(generator.create()), (43, 1));

    shared_time.step();
    // the clock caught up with virtual time, keep counting
    assert_eq!(fields(generator.create()), (43, 2));

    shared_time.step();
    assert_eq!(fields(generator.create()), (50, 3));
}

fn run_regressing_clock_stays_monotonic<G: SnowflakeGenerator>(
    generator: &G,
    shared_time: &SharedMockStepTime,
) {
    let first = generator.create();
    assert_eq!(first.time_field(), 100);

    shared_time.step();
    let mut last = first;
    for _ in 0..1000 {
        let id = generator.create();
        assert!(id > last);
        assert!(id.time_field() >= 100);
        last = id;
    }
}

const LAST_TIME: i64 = SnowflakeId::MAX_TIME as i64;

/// Expects a clock at the last representable adjusted time, node 7 and a
/// counter reseeded to 1.
fn run_last_representable_time_packs<G: SnowflakeGenerator>(generator: &G) {
    let bits = generator.config().node_bits();
    let mut last = SnowflakeId::MIN;
    for counter in 1..=3 {
        let id = generator.create();
        assert_eq!(id.time_field(), SnowflakeId::MAX_TIME);
        assert_eq!(id.node(bits), 7);
        assert_eq!(id.counter(bits), counter);
        assert!(id > last);
        last = id;
    }
}

/// Expects a clock that has moved past the last representable time after
/// construction.
fn run_clock_past_time_field_saturates<G: SnowflakeGenerator>(
    generator: &G,
    shared_time: &SharedMockStepTime,
) {
    let first = generator.create();
    assert_eq!(first.time_field(), SnowflakeId::MAX_TIME - 1);

    shared_time.step();
    let second = generator.create();
    assert_eq!(second.time_field(), SnowflakeId::MAX_TIME);
    assert!(second > first);

    let third = generator.create();
    assert_eq!(third.time_field(), SnowflakeId::MAX_TIME);
    assert!(third > second);
}

fn run_counter_bound_per_millisecond<G: SnowflakeGenerator>(generator: &G) {
    let per_ms = generator.config().ids_per_millisecond() as usize;
    let mut by_time: HashMap<u64, usize> = HashMap::new();
    let mut last = SnowflakeId::MIN;
    for _ in 0..per_ms * 3 + 5 {
        let id = generator.create();
        assert!(id > last);
        last = id;
        *by_time.entry(id.time_field()).or_default() += 1;
    }
    assert!(by_time.values().all(|&count| count <= per_ms));
    assert_eq!(by_time[&42], per_ms);
    assert_eq!(by_time.len(), 4);
}

fn run_generator_monotonic<G: SnowflakeGenerator>(generator: &G) {
    const TOTAL_IDS: usize = 4096 * 256;
    let node_bits = generator.config().node_bits();
    let node = generator.config().node();

    let mut last = generator.create();
    for _ in 0..TOTAL_IDS {
        let id = generator.create();
        assert!(id > last, "{id:?} after {last:?}");
        assert_eq!(id.node(node_bits), node);
        last = id;
    }
}

fn run_generator_unique_threaded<G>(generator: G)
where
    G: SnowflakeGenerator + Send + Sync,
{
    const THREADS: usize = 16;
    const IDS_PER_THREAD: usize = 20_000;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let generator = Arc::new(generator);
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut local = Vec::with_capacity(IDS_PER_THREAD);
                for _ in 0..IDS_PER_THREAD {
                    local.push(generator.create());
                }
                assert!(local.windows(2).all(|w| w[0] < w[1]));
                let mut seen_ids = seen_ids.lock().unwrap();
                for id in local {
                    assert!(seen_ids.insert(id), "duplicate id {id:?}");
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn lock_generator_sequence_test() {
    let generator = mock_builder(MockTime { millis: 42 })
        .with_node(1)
        .with_random_fn(|| 0)
        .build()
        .unwrap();
    run_counter_increments_within_same_tick(&generator);
}

#[test]
fn atomic_generator_sequence_test() {
    let generator = mock_builder(MockTime { millis: 42 })
        .with_node(1)
        .with_random_fn(|| 0)
        .build_atomic()
        .unwrap();
    run_counter_increments_within_same_tick(&generator);
}

#[test]
fn lock_generator_overflow_test() {
    let shared_time = SharedMockStepTime::new(vec![42, 43, 50]);
    let generator = mock_builder(shared_time.clone())
        .with_node_bits(20)
        .with_node(9)
        .with_random_fn(|| 3)
        .build()
        .unwrap();
    run_counter_overflow_advances_time(&generator, &shared_time);
}

#[test]
fn atomic_generator_overflow_test() {
    let shared_time = SharedMockStepTime::new(vec![42, 43, 50]);
    let generator = mock_builder(shared_time.clone())
        .with_node_bits(20)
        .with_node(9)
        .with_random_fn(|| 3)
        .build_atomic()
        .unwrap();
    run_counter_overflow_advances_time(&generator, &shared_time);
}

#[test]
fn lock_generator_regressing_clock_test() {
    let shared_time = SharedMockStepTime::new(vec![100, 40]);
    let generator = mock_builder(shared_time.clone()).build().unwrap();
    run_regressing_clock_stays_monotonic(&generator, &shared_time);
}

#[test]
fn atomic_generator_regressing_clock_test() {
    let shared_time = SharedMockStepTime::new(vec![100, 40]);
    let generator = mock_builder(shared_time.clone()).build_atomic().unwrap();
    run_regressing_clock_stays_monotonic(&generator, &shared_time);
}

#[test]
fn lock_generator_last_representable_time_test() {
    let generator = mock_builder(MockTime { millis: LAST_TIME })
        .with_node(7)
        .with_random_fn(|| 1)
        .build()
        .unwrap();
    run_last_representable_time_packs(&generator);
}

#[test]
fn atomic_generator_last_representable_time_test() {
    let generator = mock_builder(MockTime { millis: LAST_TIME })
        .with_node(7)
        .with_random_fn(|| 1)
        .build_atomic()
        .unwrap();
    run_last_representable_time_packs(&generator);
}

#[test]
fn lock_generator_clock_past_time_field_test() {
    let shared_time = SharedMockStepTime::new(vec![LAST_TIME - 1, LAST_TIME + 1_000]);
    let generator = mock_builder(shared_time.clone())
        .with_random_fn(|| 0)
        .build()
        .unwrap();
    run_clock_past_time_field_saturates(&generator, &shared_time);
}

#[test]
fn atomic_generator_clock_past_time_field_test() {
    let shared_time = SharedMockStepTime::new(vec![LAST_TIME - 1, LAST_TIME + 1_000]);
    let generator = mock_builder(shared_time.clone())
        .with_random_fn(|| 0)
        .build_atomic()
        .unwrap();
    run_clock_past_time_field_saturates(&generator, &shared_time);
}

#[test]
fn time_past_the_field_is_rejected() {
    let too_late = || mock_builder(MockTime { millis: LAST_TIME + 1 });
    let expected = Error::ClockOutOfRange {
        now: LAST_TIME + 1,
        epoch: 0,
    };
    assert_eq!(too_late().build().unwrap_err(), expected);
    assert_eq!(too_late().build_atomic().unwrap_err(), expected);

    let distant_epoch = || {
        mock_builder(MockTime { millis: 1_700_000_000_000 }).with_epoch_millis(-3_000_000_000_000)
    };
    assert!(matches!(
        distant_epoch().build().unwrap_err(),
        Error::ClockOutOfRange { .. }
    ));
    assert!(matches!(
        distant_epoch().build_atomic().unwrap_err(),
        Error::ClockOutOfRange { .. }
    ));

    let extreme = mock_builder(MockTime { millis: i64::MAX }).with_epoch_millis(i64::MIN);
    assert!(matches!(extreme.build().unwrap_err(), Error::ClockOutOfRange { .. }));
}

#[test]
fn lock_generator_256_bound_test() {
    let generator = mock_builder(MockTime { millis: 42 })
        .with_node_bits(8)
        .with_random_fn(|| 0)
        .build()
        .unwrap();
    assert_eq!(generator.config().ids_per_millisecond(), 16384);
    run_counter_bound_per_millisecond(&generator);
}

#[test]
fn atomic_generator_256_bound_test() {
    let generator = mock_builder(MockTime { millis: 42 })
        .with_node_bits(8)
        .with_random_fn(|| 0)
        .build_atomic()
        .unwrap();
    run_counter_bound_per_millisecond(&generator);
}

#[test]
fn lock_generator_system_clock_monotonic() {
    let generator = GeneratorBuilder::new()
        .ignore_environment()
        .with_node(1)
        .build()
        .unwrap();
    run_generator_monotonic(&generator);
}

#[test]
fn atomic_generator_system_clock_monotonic() {
    let generator = GeneratorBuilder::new()
        .ignore_environment()
        .with_node(1)
        .build_atomic()
        .unwrap();
    run_generator_monotonic(&generator);
}

#[test]
fn lock_generator_threaded_unique() {
    let generator = GeneratorBuilder::new()
        .ignore_environment()
        .with_node_bits(8)
        .build()
        .unwrap();
    run_generator_unique_threaded(generator);
}

#[test]
fn atomic_generator_threaded_unique() {
    let generator = GeneratorBuilder::new()
        .ignore_environment()
        .with_node_bits(8)
        .build_atomic()
        .unwrap();
    run_generator_unique_threaded(generator);
}

#[test]
fn system_clock_respects_counter_bound() {
    let generator = GeneratorBuilder::new()
        .ignore_environment()
        .with_node_bits(8)
        .build()
        .unwrap();
    let mut by_time: HashMap<u64, usize> = HashMap::new();
    for _ in 0..200_000 {
        *by_time.entry(generator.create().time_field()).or_default() += 1;
    }
    assert!(by_time.values().all(|&count| count <= 16384));
}

#[test]
fn byte_random_reseeds_from_folded_bytes() {
    let generator = mock_builder(MockTime { millis: 42 })
        .with_node_bits(10)
        .with_node(0)
        .with_random_bytes_fn(|len| vec![0xFF; len])
        .build()
        .unwrap();
    let first = generator.create();
    assert_eq!(first.counter(10), 0xFFF);
    let second = generator.create();
    assert_eq!(second.time_field(), 43);
    assert_eq!(second.counter(10), 0);
}

#[test]
fn custom_epoch_is_subtracted() {
    let generator = mock_builder(MockTime { millis: 1_000_042 })
        .with_epoch_millis(1_000_000)
        .build()
        .unwrap();
    let id = generator.create();
    assert_eq!(id.time_field(), 42);
    assert_eq!(id.unix_millis(1_000_000), 1_000_042);
}

#[test]
fn utc_offset_shifts_clock() {
    let generator = GeneratorBuilder::new()
        .ignore_environment()
        .with_utc_offset_millis(3_600_000)
        .build()
        .unwrap();
    let now = SystemClock::new().current_millis();
    let id = generator.create();
    let shifted = id.unix_millis_default() - now;
    assert!((3_600_000..3_600_000 + 1_000).contains(&shifted));
}

#[test]
fn clones_share_state() {
    let generator = mock_builder(MockTime { millis: 42 })
        .with_random_fn(|| 0)
        .build()
        .unwrap();
    let clone = generator.clone();
    let a = generator.create();
    let b = clone.create();
    let c = generator.create();
    assert!(a < b && b < c);
}

#[test]
fn generator_trait_through_references() {
    fn take<G: SnowflakeGenerator>(generator: G) -> SnowflakeId {
        generator.create()
    }

    let generator = mock_builder(MockTime { millis: 42 })
        .with_random_fn(|| 0)
        .build()
        .unwrap();
    let a = take(&generator);
    let b = take(Arc::new(generator));
    assert!(a < b);
}

#[test]
fn factories_check_node_range() {
    let generator = new_256_with_node(255).unwrap();
    assert_eq!(generator.config().node_bits(), 8);
    assert_eq!(generator.create().node(8), 255);
    assert_eq!(
        new_256_with_node(256).unwrap_err(),
        Error::NodeOutOfRange { node: 256, max: 255 }
    );

    assert_eq!(new_1024_with_node(1023).unwrap().config().node(), 1023);
    assert!(new_1024_with_node(1024).is_err());

    assert_eq!(new_4096_with_node(7).unwrap().config().counter_bits(), 10);
    assert!(new_4096_with_node(4096).unwrap_err().is_configuration());
}
