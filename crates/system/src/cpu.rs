use sysinfo::System;
use vigil_core::state::CpuInfo;

/// Summarise the CPUs of an already-refreshed [`System`].
///
/// Usage figures are only meaningful after two CPU refreshes separated by
/// [`sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`]; frequency needs a refresh that
/// includes `with_frequency()`.
pub fn read_cpu_info(sys: &System) -> CpuInfo {
    let cpus = sys.cpus();
    CpuInfo {
        brand:          cpus.first().map(|c| c.brand().trim().to_string()).unwrap_or_default(),
        logical_cores:  cpus.len(),
        physical_cores: System::physical_core_count(),
        frequency_mhz:  cpus.first().map_or(0, |c| c.frequency()),
        per_core:       cpus.iter().map(|c| c.cpu_usage()).collect(),
    }
}
