use sysinfo::{CpuRefreshKind, System};
use vigil_core::state::{CpuInfo, HostInfo, MemoryInfo};

use crate::{cpu::read_cpu_info, memory::read_memory_info};

/// Static facts about the running machine.
pub fn host_info() -> HostInfo {
    HostInfo {
        os_name:        System::name(),
        os_version:     System::os_version(),
        kernel_version: System::kernel_version(),
        host_name:      System::host_name(),
        arch:           std::env::consts::ARCH.to_string(),
        uptime:         System::uptime(),
    }
}

/// CPU and memory readings, refreshed twice so CPU usage is populated.
pub fn usage() -> (CpuInfo, MemoryInfo) {
    let mut sys = System::new();
    sys.refresh_cpu_specifics(CpuRefreshKind::everything());
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_specifics(CpuRefreshKind::everything());
    sys.refresh_memory();

    (read_cpu_info(&sys), read_memory_info(&sys))
}

/// Render an uptime like `"3d 4h 12m"`.
pub fn format_uptime(secs: u64) -> String {
    let days    = secs / 86_400;
    let hours   = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
