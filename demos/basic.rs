//! Basic usage example for the sentinel crate.

use core::time::Duration;
use sentinel::{ManualClock, Outcome, Sentinel, SentinelConfig};

fn main() {
    println!("=== Basic Sentinel Example ===\n");

    // Example 1: Simple detection
    simple_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 2: Block lifecycle
    lifecycle_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 3: Window boundary behavior
    boundary_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 4: Driving time by hand
    manual_clock_example();

    println!("{}", "\n".to_owned() + "=".repeat(50).as_str() + "\n");

    // Example 5: Monitoring
    monitoring_example();
}

fn simple_example() {
    println!("1. Simple Detection:");

    // 2 requests/second over a 2-second window tolerates 4 per window
    let sentinel = Sentinel::new(Duration::from_secs(2), 2.0);

    println!("   Created detector: 2s window, 2 req/s (threshold 4)");

    let mut admitted = 0;
    let mut turned_away = 0;

    // One client firing every 300ms, faster than its budget allows
    for i in 0..8u64 {
        let at = Duration::from_millis(i * 300);
        match sentinel.process_request("192.0.2.1", at) {
            Outcome::Admitted => {
                admitted += 1;
                println!("   Request {} at {:?} - ✅ Admitted", i + 1, at);
            }
            Outcome::Blocked => {
                turned_away += 1;
                println!(
                    "   Request {} at {:?} - ⛔ Suspicious, entity blocked",
                    i + 1,
                    at
                );
            }
            Outcome::Rejected => {
                turned_away += 1;
                println!(
                    "   Request {} at {:?} - ✕ Rejected (already blocked)",
                    i + 1,
                    at
                );
            }
        }
    }

    println!(
        "   Results: {} admitted, {} turned away",
        admitted, turned_away
    );
}

fn lifecycle_example() {
    println!("2. Block Lifecycle:");

    let config = SentinelConfig::per_window(3, Duration::from_secs(10));
    let sentinel = Sentinel::with_config(config);

    println!("   Budget: 3 requests per 10-second window");

    // Use up the budget and trip the detector
    for i in 0..4u64 {
        let outcome = sentinel.process_request("device-7", Duration::from_secs(i));
        println!("   Request {} - {:?}", i + 1, outcome);
    }

    println!("   Blocked? {}", sentinel.is_blocked(&"device-7"));

    // An operator reviews the alert and lifts the block
    sentinel.unblock("device-7");
    println!("   ... operator unblocks device-7 ...");
    println!("   Blocked? {}", sentinel.is_blocked(&"device-7"));

    // Service resumes with a clean history
    let outcome = sentinel.process_request("device-7", Duration::from_secs(4));
    println!("   Next request - {:?}", outcome);
}

fn boundary_example() {
    println!("3. Window Boundary:");

    let config = SentinelConfig::per_window(1, Duration::from_secs(10));

    println!("   Budget: 1 request per 10-second window");

    // A request exactly `window` old still counts
    let sentinel = Sentinel::with_config(config.clone());
    sentinel.process_request("edge", Duration::from_secs(0));
    let at_boundary = sentinel.process_request("edge", Duration::from_secs(10));
    println!("   Second request exactly 10s later - {:?}", at_boundary);

    // One millisecond past the boundary the first one has aged out
    let sentinel = Sentinel::with_config(config);
    sentinel.process_request("edge", Duration::from_secs(0));
    let past_boundary =
        sentinel.process_request("edge", Duration::from_secs(10) + Duration::from_millis(1));
    println!("   Second request 10.001s later     - {:?}", past_boundary);
}

fn manual_clock_example() {
    println!("4. Driving Time by Hand:");

    let clock = ManualClock::new();
    let config = SentinelConfig::per_window(2, Duration::from_secs(10));
    let sentinel = Sentinel::with_clock(config, clock.clone());

    println!("   Budget: 2 requests per 10-second window");

    println!("   t=0s    process - {:?}", sentinel.process("job-runner"));
    clock.advance(Duration::from_secs(1));
    println!("   t=1s    process - {:?}", sentinel.process("job-runner"));
    clock.advance(Duration::from_secs(11));
    println!(
        "   t=12s   process - {:?} (earlier requests aged out)",
        sentinel.process("job-runner")
    );
    clock.advance(Duration::from_millis(100));
    println!("   t=12.1s process - {:?}", sentinel.process("job-runner"));
    clock.advance(Duration::from_millis(100));
    println!(
        "   t=12.2s process - {:?} (third in-window request)",
        sentinel.process("job-runner")
    );
}

fn monitoring_example() {
    println!("5. Monitoring and Snapshots:");

    let config = SentinelConfig::per_window(5, Duration::from_secs(10));
    let sentinel = Sentinel::with_config(config);

    // Mixed traffic: a polite client, a scraper, and a known-bad actor
    for i in 0..3u64 {
        sentinel.process_request("polite", Duration::from_secs(i * 3));
    }
    for i in 0..8u64 {
        sentinel.process_request("scraper", Duration::from_millis(i * 50));
    }
    sentinel.block("known-bad");

    println!("   Per-entity snapshot:");
    let mut entries: Vec<_> = sentinel.snapshot().into_iter().collect();
    entries.sort_by_key(|(key, _)| *key);
    for (key, report) in entries {
        println!(
            "   - {:<10} {} ({} recent requests)",
            key, report.status, report.recent_requests
        );
    }

    println!();
    println!("{}", sentinel.stats().summary());
}
