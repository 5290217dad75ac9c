use p256fun::{GENERATOR_TABLE, GeneratorTable, Scalar, SharedTable, mul_base};
use std::sync::{
    Barrier,
    atomic::{AtomicUsize, Ordering},
};

const THREADS: usize = 8;

#[test]
fn concurrent_first_use_builds_once() {
    static TABLE: SharedTable = SharedTable::new();
    static BUILDS: AtomicUsize = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let seen = std::thread::scope(|s| {
        let handles = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let table = TABLE.get_or_init_with(|| {
                        BUILDS.fetch_add(1, Ordering::SeqCst);
                        GeneratorTable::new()
                    });
                    table as *const GeneratorTable as usize
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    assert!(seen.iter().all(|address| *address == seen[0]));
    assert!(TABLE.is_built());
}

#[test]
fn global_table_matches_fresh_table() {
    let fresh = GeneratorTable::new();
    let shared = GENERATOR_TABLE.get();
    assert!(GENERATOR_TABLE.is_built());
    for window in [0, 18, 36] {
        for index in [0, 31, 63] {
            assert_eq!(shared.entry(window, index), fresh.entry(window, index));
        }
    }
    let k = Scalar::from_u64(0x1234_5678_9abc_def0);
    assert_eq!(mul_base(shared, &k), mul_base(&fresh, &k));
}
