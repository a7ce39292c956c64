use std::path::Path;
use vigil_core::state::BatteryStatus;

/// Where Linux exposes power-supply devices.
pub const SYSFS_POWER_SUPPLY: &str = "/sys/class/power_supply";

/// Read battery state from the Linux sysfs power-supply interface.
///
/// Returns the status of the first battery found, or `None` if the system
/// has no battery (desktop, VM).
pub fn read_battery() -> Option<BatteryStatus> {
    read_battery_from(Path::new(SYSFS_POWER_SUPPLY))
}

/// Same as [`read_battery`] but rooted at an arbitrary directory.
pub fn read_battery_from(root: &Path) -> Option<BatteryStatus> {
    for name in ["BAT0", "BAT1", "BAT2"] {
        let base = root.join(name);
        if !base.exists() {
            continue;
        }

        let capacity = std::fs::read_to_string(base.join("capacity")).ok()?;
        let status   = std::fs::read_to_string(base.join("status")).ok()?;

        let percent  = capacity.trim().parse::<u8>().ok()?.min(100);
        let charging = matches!(status.trim(), "Charging" | "Full");
        let secs_left = if charging { None } else { seconds_left(&base) };

        return Some(BatteryStatus { percent, charging, secs_left });
    }
    None
}

/// Estimate time to empty from energy/power (µWh, µW) or charge/current
/// (µAh, µA), whichever pair the driver exposes.
fn seconds_left(base: &Path) -> Option<u64> {
    let read = |file: &str| -> Option<f64> {
        std::fs::read_to_string(base.join(file))
            .ok()?
            .trim()
            .parse::<f64>()
            .ok()
    };

    let (remaining, rate) = match (read("energy_now"), read("power_now")) {
        (Some(energy), Some(power)) => (energy, power),
        _ => (read("charge_now")?, read("current_now")?),
    };

    if rate <= 0.0 {
        return None;
    }
    Some((remaining / rate * 3600.0) as u64)
}

/// Human-readable time left, e.g. `"2h 45m remaining"`.
pub fn format_remaining(status: &BatteryStatus) -> String {
    if status.charging {
        return "Connected to power".to_string();
    }
    match status.secs_left {
        None => "Time remaining unknown".to_string(),
        Some(secs) => {
            let hours   = secs / 3600;
            let minutes = (secs % 3600) / 60;
            format!("{hours}h {minutes}m remaining")
        }
    }
}
