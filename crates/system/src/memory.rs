use sysinfo::System;
use vigil_core::state::MemoryInfo;

/// RAM and swap figures from an already-refreshed [`System`].
pub fn read_memory_info(sys: &System) -> MemoryInfo {
    MemoryInfo {
        ram_used:   sys.used_memory(),
        ram_total:  sys.total_memory(),
        swap_used:  sys.used_swap(),
        swap_total: sys.total_swap(),
    }
}

/// Format a byte count as a human-readable string (e.g. `"7.3 GiB"`).
pub fn format_bytes(bytes: u64) -> String {
    const GIB: u64 = 1 << 30;
    const MIB: u64 = 1 << 20;
    const KIB: u64 = 1 << 10;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Format a transfer rate, e.g. `"1.5 MiB/s"`.
pub fn format_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec.max(0.0) as u64))
}
