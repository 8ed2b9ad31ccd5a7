use sentinel::{
    EntityStatus, ManualClock, Outcome, Sentinel, SentinelBuilder, SentinelConfig,
};
use std::net::IpAddr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[test]
fn test_burst_traffic_lifecycle() {
    // 2 req/s over a 10s window tolerates 20 requests per window.
    let sentinel: Sentinel<&str> = Sentinel::new(secs(10), 2.0);

    // A burst of 20 requests 100ms apart stays within budget.
    for i in 0..20 {
        assert_eq!(
            sentinel.process_request("client", millis(i * 100)),
            Outcome::Admitted,
            "request {} of the burst should be admitted",
            i + 1
        );
    }

    // The 21st request is still inside the window and goes over.
    assert_eq!(sentinel.process_request("client", secs(2)), Outcome::Blocked);

    // From here on everything bounces, without being evaluated.
    assert_eq!(
        sentinel.process_request("client", millis(2_100)),
        Outcome::Rejected
    );
    assert!(sentinel.is_blocked(&"client"));

    // Blocking dropped the history.
    let snapshot = sentinel.snapshot();
    assert_eq!(snapshot["client"].status, EntityStatus::Blocked);
    assert_eq!(snapshot["client"].recent_requests, 0);

    // An operator lifts the block; service resumes with a clean slate.
    sentinel.unblock("client");
    assert_eq!(
        sentinel.process_request("client", millis(2_200)),
        Outcome::Admitted
    );

    let stats = sentinel.stats();
    assert_eq!(stats.total_admitted, 21);
    assert_eq!(stats.total_tripped, 1);
    assert_eq!(stats.total_rejected, 1);
    assert_eq!(stats.blocked_entities, 0);
}

#[test]
fn test_steady_rate_trips_at_threshold() {
    // At most 10 requests in any 60-second window.
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(10, secs(60)));

    // One request per second is fine for the first ten.
    for t in 0..10 {
        assert_eq!(sentinel.process_request("crawler", secs(t)), Outcome::Admitted);
    }

    // The 11th is only ten seconds in, so all ten predecessors still count.
    assert_eq!(sentinel.process_request("crawler", secs(10)), Outcome::Blocked);
}

#[test]
fn test_threshold_sweep() {
    // The budget admits exactly `max` requests and trips on the next one.
    for max in [1u32, 2, 3, 5, 8] {
        let sentinel: Sentinel<&str> =
            Sentinel::with_config(SentinelConfig::per_window(max, secs(10)));

        for i in 0..max {
            assert_eq!(
                sentinel.process_request("probe", millis(u64::from(i))),
                Outcome::Admitted,
                "budget of {} should admit request {}",
                max,
                i + 1
            );
        }
        assert_eq!(
            sentinel.process_request("probe", millis(u64::from(max))),
            Outcome::Blocked,
            "budget of {} should trip on request {}",
            max,
            max + 1
        );
    }
}

#[test]
fn test_budget_is_exact_for_awkward_window_lengths() {
    // 2 requests per 49 seconds: the derived rate is not exactly
    // representable, but the budget must still admit both requests and
    // trip on the third.
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(2, secs(49)));

    assert_eq!(sentinel.process_request("meter", secs(0)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("meter", secs(1)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("meter", secs(2)), Outcome::Blocked);

    // 1 per 49 seconds is a sane budget: the threshold is exactly one, so
    // construction must not reject it.
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(1, secs(49)));

    assert_eq!(sentinel.process_request("lone", secs(0)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("lone", secs(1)), Outcome::Blocked);
}

#[test]
fn test_window_boundary_semantics() {
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(1, secs(10)));

    // A request exactly `window` old still counts against the budget.
    assert_eq!(sentinel.process_request("edge-in", secs(0)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("edge-in", secs(10)), Outcome::Blocked);

    // One millisecond past the boundary it has aged out.
    assert_eq!(sentinel.process_request("edge-out", secs(0)), Outcome::Admitted);
    assert_eq!(
        sentinel.process_request("edge-out", secs(10) + millis(1)),
        Outcome::Admitted
    );
}

#[test]
fn test_out_of_order_timestamps_count_conservatively() {
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(3, secs(10)));

    // A replayed log with a clock step backwards in the middle. Requests
    // that look like they are from the future still count.
    assert_eq!(sentinel.process_request("replay", secs(5)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("replay", secs(3)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("replay", secs(4)), Outcome::Admitted);
    assert_eq!(sentinel.process_request("replay", secs(5)), Outcome::Blocked);
}

#[test]
fn test_block_is_sticky_without_operator() {
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(1, secs(10)));

    sentinel.process_request("patient", secs(0));
    assert_eq!(sentinel.process_request("patient", secs(1)), Outcome::Blocked);

    // No amount of waiting lifts a block.
    for quiet in [secs(60), secs(3_600), secs(86_400)] {
        assert_eq!(
            sentinel.process_request("patient", quiet),
            Outcome::Rejected,
            "block should survive {quiet:?} of silence"
        );
    }
    assert!(sentinel.is_blocked(&"patient"));

    sentinel.unblock("patient");
    assert_eq!(
        sentinel.process_request("patient", secs(86_401)),
        Outcome::Admitted
    );
}

#[test]
fn test_manual_clock_full_lifecycle() {
    let clock = ManualClock::new();
    let sentinel: Sentinel<&str, _> =
        Sentinel::with_clock(SentinelConfig::per_window(2, secs(10)), clock.clone());

    // Two requests back to back use up the budget.
    assert_eq!(sentinel.process("sensor"), Outcome::Admitted);
    clock.advance(secs(1));
    assert_eq!(sentinel.process("sensor"), Outcome::Admitted);

    // Eleven quiet seconds later both have aged out.
    clock.advance(secs(11));
    assert_eq!(sentinel.process("sensor"), Outcome::Admitted);

    // A rapid burst on top of that trips the detector.
    clock.advance(millis(100));
    assert_eq!(sentinel.process("sensor"), Outcome::Admitted);
    clock.advance(millis(100));
    assert_eq!(sentinel.process("sensor"), Outcome::Blocked);
    clock.advance(millis(100));
    assert_eq!(sentinel.process("sensor"), Outcome::Rejected);

    sentinel.unblock("sensor");
    clock.advance(millis(100));
    assert_eq!(sentinel.process("sensor"), Outcome::Admitted);
}

#[test]
fn test_entities_do_not_interfere() {
    let sentinel: Sentinel<String> =
        Sentinel::with_config(SentinelConfig::per_window(5, secs(10)));

    // Four devices each exhaust their own budget independently.
    for device in 0..4 {
        let key = format!("device-{device}");
        for i in 0..5 {
            assert_eq!(
                sentinel.process_request(key.clone(), millis(i)),
                Outcome::Admitted
            );
        }
        assert_eq!(sentinel.process_request(key.clone(), millis(5)), Outcome::Blocked);
    }

    let stats = sentinel.stats();
    assert_eq!(stats.tracked_entities, 4);
    assert_eq!(stats.blocked_entities, 4);
    assert_eq!(stats.total_admitted, 20);
    assert_eq!(stats.total_tripped, 4);
}

#[test]
fn test_contended_single_entity_is_exact() {
    // 8 threads hammer one key with in-window timestamps. The per-entity
    // lock serializes judgement, so the outcome split is deterministic.
    let sentinel: Arc<Sentinel<&str>> = Arc::new(Sentinel::with_config(
        SentinelConfig::per_window(20, secs(10)),
    ));
    let mut handles = vec![];

    for _ in 0..8 {
        let sentinel_clone = Arc::clone(&sentinel);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                sentinel_clone.process_request("hot", secs(5));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = sentinel.stats();
    assert_eq!(stats.tracked_entities, 1);
    assert_eq!(stats.total_admitted, 20);
    assert_eq!(stats.total_tripped, 1);
    assert_eq!(stats.total_rejected, 379);
    assert_eq!(stats.total_requests(), 400);
}

#[test]
fn test_concurrent_distinct_entities_scale() {
    let sentinel: Arc<Sentinel<String>> = Arc::new(
        SentinelBuilder::new()
            .window(secs(10))
            .rate_limit(1_000.0)
            .build(),
    );
    let mut handles = vec![];

    for worker in 0..8 {
        let sentinel_clone = Arc::clone(&sentinel);
        handles.push(thread::spawn(move || {
            let key = format!("worker-{worker}");
            for i in 0..250u64 {
                assert_eq!(
                    sentinel_clone.process_request(key.clone(), millis(i)),
                    Outcome::Admitted
                );
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = sentinel.stats();
    assert_eq!(stats.tracked_entities, 8);
    assert_eq!(stats.total_admitted, 2_000);
    assert_eq!(stats.blocked_entities, 0);
}

#[test]
fn test_operator_block_and_unblock() {
    let sentinel: Sentinel<&str> = Sentinel::new(secs(10), 2.0);

    // Blocking an entity the detector has never seen tracks it as blocked.
    sentinel.block("threat-intel-hit");
    assert!(sentinel.is_blocked(&"threat-intel-hit"));
    assert_eq!(
        sentinel.process_request("threat-intel-hit", secs(0)),
        Outcome::Rejected
    );

    // Unblocking an unknown entity leaves it tracked and active.
    sentinel.unblock("false-alarm");
    assert!(!sentinel.is_blocked(&"false-alarm"));
    assert_eq!(sentinel.tracked_entities(), 2);
    assert_eq!(sentinel.blocked_entities(), 1);

    // Asking about an unknown entity does not start tracking it.
    assert!(!sentinel.is_blocked(&"stranger"));
    assert_eq!(sentinel.tracked_entities(), 2);
}

#[test]
fn test_snapshot_and_stats_lifecycle() {
    let sentinel: Sentinel<&str> =
        Sentinel::with_config(SentinelConfig::per_window(3, secs(10)));

    sentinel.process_request("calm", secs(0));
    sentinel.process_request("busy", secs(0));
    sentinel.process_request("busy", secs(1));
    sentinel.process_request("busy", secs(2));
    sentinel.process_request("busy", secs(3)); // trips
    sentinel.process_request("busy", secs(4)); // rejected
    sentinel.block("banned");

    let snapshot = sentinel.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot["calm"].status, EntityStatus::Active);
    assert_eq!(snapshot["calm"].recent_requests, 1);
    assert_eq!(snapshot["busy"].status, EntityStatus::Blocked);
    assert_eq!(snapshot["busy"].recent_requests, 0);
    assert_eq!(snapshot["banned"].status, EntityStatus::Blocked);

    let stats = sentinel.stats();
    assert_eq!(stats.tracked_entities, 3);
    assert_eq!(stats.blocked_entities, 2);
    assert_eq!(stats.total_admitted, 4);
    assert_eq!(stats.total_tripped, 1);
    assert_eq!(stats.total_rejected, 1);

    let summary = stats.summary();
    println!("{summary}");
    assert!(summary.contains("3 tracked"));
    assert!(summary.contains("2 blocked"));
    assert!(summary.contains("6 total"));
}

#[test]
fn test_ip_address_keys() {
    // Keys are generic; IP addresses are the classic case.
    let sentinel: Sentinel<IpAddr> =
        Sentinel::with_config(SentinelConfig::per_window(2, secs(10)));

    let attacker: IpAddr = "203.0.113.66".parse().unwrap();
    let bystander: IpAddr = "198.51.100.7".parse().unwrap();

    assert_eq!(sentinel.process_request(attacker, millis(0)), Outcome::Admitted);
    assert_eq!(sentinel.process_request(attacker, millis(5)), Outcome::Admitted);
    assert_eq!(sentinel.process_request(attacker, millis(10)), Outcome::Blocked);

    assert_eq!(sentinel.process_request(bystander, millis(10)), Outcome::Admitted);
    assert!(sentinel.is_blocked(&attacker));
    assert!(!sentinel.is_blocked(&bystander));
}
