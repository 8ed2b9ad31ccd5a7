//! Simulates a small device fleet with one device gone haywire.
//!
//! Every device reports through the same detector. The noisy one trips the
//! threshold and is quarantined without slowing down its neighbors; an
//! operator lets it back in once its firmware is fixed.

use core::net::{IpAddr, Ipv4Addr};
use core::time::Duration;
use sentinel::{Outcome, Sentinel, SentinelConfig};

struct Device {
    name: &'static str,
    addr: IpAddr,
    period: Duration,
}

fn main() {
    // A device is suspicious above 5 requests per 5-second window.
    let config = SentinelConfig::per_window(5, Duration::from_secs(5));
    let sentinel = Sentinel::with_config(config);

    let fleet = [
        Device {
            name: "thermostat",
            addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            period: Duration::from_millis(1_500),
        },
        Device {
            name: "doorbell",
            addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            period: Duration::from_millis(2_500),
        },
        Device {
            name: "camera",
            addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3)),
            period: Duration::from_millis(1_100),
        },
        // Firmware bug: reporting every 200ms instead of every 2s
        Device {
            name: "haywire",
            addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 66)),
            period: Duration::from_millis(200),
        },
    ];

    println!("Simulating 10 seconds of fleet traffic (threshold: 5 requests / 5s)\n");

    // Walk a simulated timeline in 100ms ticks; each device reports
    // whenever its period comes up.
    let tick = Duration::from_millis(100);
    let mut now = Duration::ZERO;

    while now <= Duration::from_secs(10) {
        for device in &fleet {
            if now.as_millis() % device.period.as_millis() == 0 {
                let outcome = sentinel.process_request(device.addr, now);
                if outcome == Outcome::Blocked {
                    println!(
                        "{:>5.1}s  ⛔ {} ({}) tripped the detector",
                        now.as_secs_f64(),
                        device.name,
                        device.addr
                    );
                }
            }
        }
        now += tick;
    }

    println!("\nFleet status after the storm:");
    let mut entries: Vec<_> = sentinel.snapshot().into_iter().collect();
    entries.sort_by_key(|(addr, _)| *addr);
    for (addr, report) in entries {
        let name = fleet
            .iter()
            .find(|device| device.addr == addr)
            .map(|device| device.name)
            .unwrap_or("?");
        println!(
            "  {:<12} {:<12} {}",
            name,
            addr.to_string(),
            report.status
        );
    }

    // Firmware fixed; let the noisy device back in.
    let haywire = fleet[3].addr;
    sentinel.unblock(haywire);
    let outcome = sentinel.process_request(haywire, Duration::from_secs(10) + tick);
    println!("\nAfter unblocking {}: next request {:?}", haywire, outcome);

    println!("\n{}", sentinel.stats().summary());
}
