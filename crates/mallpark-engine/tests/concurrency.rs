use std::collections::HashSet;
use std::sync::Barrier;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mallpark_core::{EntryRequest, MallConfig, MallRegistration, ParkingError, SlotSpec, VehicleSize};
use mallpark_engine::SessionManager;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn manager_with(malls: &[(&str, usize)]) -> SessionManager {
    let manager = SessionManager::default();
    for &(id, slots) in malls {
        let slots = (0..slots)
            .map(|i| SlotSpec::new("SP", vec![i as i64, i as i64, i as i64]))
            .collect();
        manager
            .register_mall(MallRegistration {
                mall: MallConfig::new(id, id),
                slots,
            })
            .unwrap();
    }
    manager
}

#[test]
fn concurrent_entries_never_share_a_slot() {
    const SLOTS: usize = 8;
    const CARS: usize = 32;

    let manager = manager_with(&[("m", SLOTS)]);
    let barrier = Barrier::new(CARS);

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..CARS)
            .map(|i| {
                let manager = &manager;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    manager.enter_at(
                        EntryRequest::new("m", i % 3, format!("CAR-{}", i), VehicleSize::S),
                        t0(),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let parked: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(parked.len(), SLOTS);

    let slots: HashSet<&str> = parked.iter().map(|s| s.slot_id.as_str()).collect();
    assert_eq!(slots.len(), SLOTS);

    for result in &results {
        if let Err(e) = result {
            assert_eq!(*e, ParkingError::NoSlotAvailable);
        }
    }

    let snapshot = manager.mall_snapshot("m").unwrap();
    assert_eq!(snapshot.free_slots(), 0);
    assert_eq!(snapshot.open_sessions.len(), SLOTS);
}

#[test]
fn same_plate_races_into_two_malls() {
    const ROUNDS: usize = 20;

    let manager = manager_with(&[("east", 4), ("west", 4)]);

    for round in 0..ROUNDS {
        let plate = format!("RACE-{}", round);
        let barrier = Barrier::new(2);

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = ["east", "west"]
                .into_iter()
                .map(|mall| {
                    let manager = &manager;
                    let barrier = &barrier;
                    let plate = plate.clone();
                    s.spawn(move || {
                        barrier.wait();
                        manager.enter_at(EntryRequest::new(mall, 0, plate, VehicleSize::S), t0())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ok = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok, 1, "round {}", round);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(ParkingError::VehicleAlreadyParked { .. })
        )));

        manager.exit(&plate, t0() + Duration::minutes(1)).unwrap();
    }
}

#[test]
fn concurrent_exits_close_once() {
    let manager = manager_with(&[("m", 2)]);
    manager
        .enter_at(EntryRequest::new("m", 0, "ONCE", VehicleSize::S), t0())
        .unwrap();

    let barrier = Barrier::new(4);
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = &manager;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    manager.exit("ONCE", t0() + Duration::hours(1))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(result, ParkingError::VehicleNotParked { .. }));
    }
    assert_eq!(manager.mall_snapshot("m").unwrap().free_slots(), 2);
}

#[test]
fn independent_malls_fill_in_parallel() {
    let malls = [("a", 5), ("b", 5), ("c", 5)];
    let manager = manager_with(&malls);

    std::thread::scope(|s| {
        for (mall, slots) in malls {
            let manager = &manager;
            s.spawn(move || {
                for i in 0..slots {
                    manager
                        .enter_at(
                            EntryRequest::new(mall, 1, format!("{}-{}", mall, i), VehicleSize::S),
                            t0(),
                        )
                        .unwrap();
                }
            });
        }
    });

    for (mall, _) in malls {
        assert_eq!(manager.mall_snapshot(mall).unwrap().free_slots(), 0);
    }
}
