//! Lock Strategy Tests
//!
//! Both lock implementations must give shared reads and exclusive writes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use recstore::config::LockKind;
use recstore::store::{lock_for, ParkingLotSequence, Sequence, SequenceLock, StdSequence};

fn all_locks(values: Vec<i32>) -> Vec<Arc<dyn SequenceLock>> {
    let parking: Arc<dyn SequenceLock> =
        Arc::new(ParkingLotSequence::new(Sequence::from_values(values.clone())));
    let std_lock: Arc<dyn SequenceLock> = Arc::new(StdSequence::new(Sequence::from_values(values)));
    vec![parking, std_lock]
}

#[test]
fn test_lock_for_picks_implementation() {
    let parking = lock_for(LockKind::ParkingLot, Sequence::new());
    let std_lock = lock_for(LockKind::Std, Sequence::new());

    assert_eq!(parking.description(), "parking_lot::RwLock");
    assert_eq!(std_lock.description(), "std::sync::RwLock");
}

#[test]
fn test_write_then_read() {
    for lock in all_locks(vec![1, 2]) {
        {
            let mut hold = lock.write().unwrap();
            hold.append(3);
        }
        let hold = lock.read().unwrap();
        assert_eq!(hold.as_slice(), &[1, 2, 3], "{}", lock.description());
    }
}

#[test]
fn test_readers_share_the_lock() {
    for lock in all_locks(vec![4]) {
        let readers = 4;
        let barrier = Arc::new(Barrier::new(readers));

        // Every reader holds its guard until all readers have one.
        let handles: Vec<_> = (0..readers)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let hold = lock.read().unwrap();
                    barrier.wait();
                    hold.len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}

#[test]
fn test_writers_are_exclusive() {
    for lock in all_locks(Vec::new()) {
        let inside = Arc::new(AtomicUsize::new(0));
        let overlap = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let lock = Arc::clone(&lock);
                let inside = Arc::clone(&inside);
                let overlap = Arc::clone(&overlap);
                thread::spawn(move || {
                    for i in 0..50 {
                        let mut hold = lock.write().unwrap();
                        if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                            overlap.fetch_add(1, Ordering::SeqCst);
                        }
                        hold.append(t * 100 + i);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(overlap.load(Ordering::SeqCst), 0);
        assert_eq!(lock.read().unwrap().len(), 400);
    }
}

#[test]
fn test_reader_waits_for_writer() {
    for lock in all_locks(vec![0]) {
        let mut hold = lock.write().unwrap();

        let reader = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                let hold = lock.read().unwrap();
                hold.as_slice().to_vec()
            })
        };

        thread::sleep(Duration::from_millis(50));
        hold.append(1);
        drop(hold);

        assert_eq!(reader.join().unwrap(), vec![0, 1]);
    }
}

#[test]
fn test_std_lock_reports_poisoning() {
    let lock = Arc::new(StdSequence::new(Sequence::new()));

    let poisoner = Arc::clone(&lock);
    let _ = thread::spawn(move || {
        let _hold = poisoner.write().unwrap();
        panic!("poison the lock");
    })
    .join();

    let err = lock.read().err().expect("read should fail on a poisoned lock");
    assert!(err.to_string().contains("poisoned"));
    assert!(lock.write().is_err());
}

#[test]
fn test_parking_lot_lock_survives_panicking_writer() {
    let lock = Arc::new(ParkingLotSequence::new(Sequence::from_values(vec![1])));

    let writer = Arc::clone(&lock);
    let _ = thread::spawn(move || {
        let _hold = writer.write().unwrap();
        panic!("parking_lot does not poison");
    })
    .join();

    assert_eq!(lock.read().unwrap().as_slice(), &[1]);
}
