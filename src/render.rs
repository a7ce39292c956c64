//! Plain-text rendering of readings, history and one-shot views.

use std::fmt::Write as _;
use vigil_core::{
    state::{BatteryLevel, BatteryStatus, CpuInfo, DiskInfo, HostInfo, MemoryInfo, ProcessInfo, UsageLevel},
    History, Metric, Reading,
};
use vigil_system::{
    battery::format_remaining,
    memory::{format_bytes, format_rate},
    overview::format_uptime,
    process::Page,
};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Map `values` onto block characters. Percentages use a fixed 0–100
/// scale; rates are scaled to the window's own maximum.
pub fn sparkline(metric: Metric, values: &[f64]) -> String {
    let top = if metric.is_percentage() {
        100.0
    } else {
        values.iter().copied().fold(0.0, f64::max)
    };
    if top <= 0.0 {
        return BARS[0].to_string().repeat(values.len());
    }

    values
        .iter()
        .map(|v| {
            let level = (v / top * (BARS.len() - 1) as f64).round();
            BARS[level.clamp(0.0, (BARS.len() - 1) as f64) as usize]
        })
        .collect()
}

pub fn format_value(metric: Metric, value: f64) -> String {
    if metric.is_percentage() {
        format!("{value:.1}%")
    } else {
        format_rate(value)
    }
}

fn level_tag(metric: Metric, value: f64) -> &'static str {
    if !metric.is_percentage() || metric == Metric::Battery {
        return "";
    }
    match UsageLevel::from_percent(value) {
        UsageLevel::Normal => "",
        UsageLevel::Elevated => " !",
        UsageLevel::Critical => " !!",
    }
}

/// One block per tick: a timestamp line, then one line per tracked metric.
pub fn tick(reading: &Reading, history: &History, metrics: &[Metric]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── {} ──", reading.timestamp.format("%H:%M:%S"));

    for &metric in metrics {
        let current = match reading.get(metric) {
            Some(v) => format!("{}{}", format_value(metric, v), level_tag(metric, v)),
            None => "unavailable".to_string(),
        };
        let average = history
            .average(metric)
            .map(|v| format_value(metric, v))
            .unwrap_or_else(|| "-".to_string());

        let _ = writeln!(
            out,
            "{:<8} {:>14}  avg {:>12}  {}",
            metric.as_str(),
            current,
            average,
            sparkline(metric, &history.values(metric)),
        );
    }
    out
}

pub fn overview(host: &HostInfo, cpu: &CpuInfo, memory: &MemoryInfo, disks: &[DiskInfo]) -> String {
    let unknown = || "unknown".to_string();
    let mut out = String::new();

    let _ = writeln!(out, "Host");
    let _ = writeln!(out, "  hostname   {}", host.host_name.clone().unwrap_or_else(unknown));
    let _ = writeln!(
        out,
        "  os         {} {}",
        host.os_name.clone().unwrap_or_else(unknown),
        host.os_version.clone().unwrap_or_default()
    );
    let _ = writeln!(out, "  kernel     {}", host.kernel_version.clone().unwrap_or_else(unknown));
    let _ = writeln!(out, "  arch       {}", host.arch);
    let _ = writeln!(out, "  uptime     {}", format_uptime(host.uptime));

    let _ = writeln!(out, "\nCPU");
    let _ = writeln!(out, "  model      {}", cpu.brand);
    match cpu.physical_cores {
        Some(physical) => {
            let _ = writeln!(out, "  cores      {} logical, {physical} physical", cpu.logical_cores);
        }
        None => {
            let _ = writeln!(out, "  cores      {} logical", cpu.logical_cores);
        }
    }
    let _ = writeln!(out, "  frequency  {} MHz", cpu.frequency_mhz);
    let _ = writeln!(out, "  usage      {:.1}%", cpu.average());
    for (i, usage) in cpu.per_core.iter().enumerate() {
        let _ = writeln!(out, "    core {i:<3} {usage:>5.1}%");
    }

    let _ = writeln!(out, "\nMemory");
    let _ = writeln!(
        out,
        "  ram        {} / {} ({:.1}%)",
        format_bytes(memory.ram_used),
        format_bytes(memory.ram_total),
        memory.ram_percent()
    );
    let _ = writeln!(
        out,
        "  swap       {} / {} ({:.1}%)",
        format_bytes(memory.swap_used),
        format_bytes(memory.swap_total),
        memory.swap_percent()
    );

    let _ = writeln!(out, "\nDisks");
    if disks.is_empty() {
        let _ = writeln!(out, "  (none accessible)");
    }
    for disk in disks {
        let _ = writeln!(
            out,
            "  {:<20} {:<8} {} / {} ({:.1}%)",
            disk.mount_point.display(),
            disk.file_system,
            format_bytes(disk.used),
            format_bytes(disk.total),
            disk.percent()
        );
    }
    out
}

pub fn processes(page: &Page<'_, ProcessInfo>, total_memory: u64) -> String {
    let mut out = String::new();
    if page.items.is_empty() {
        let _ = writeln!(out, "No processes found matching your criteria.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>7}  {:<24} {:<12} {:>6} {:>10} {:>6}  {:<10} {}",
        "PID", "NAME", "USER", "CPU%", "MEM", "MEM%", "STATUS", "STARTED"
    );
    for p in page.items {
        let mem_percent = if total_memory == 0 {
            0.0
        } else {
            (p.memory_bytes as f64 / total_memory as f64 * 100.0).min(100.0)
        };
        let started = p
            .started
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let _ = writeln!(
            out,
            "{:>7}  {:<24} {:<12} {:>6.2} {:>10} {:>6.1}  {:<10} {}",
            p.pid,
            truncate(&p.name, 24),
            truncate(p.user.as_deref().unwrap_or("unknown"), 12),
            p.cpu_percent,
            format_bytes(p.memory_bytes),
            mem_percent,
            p.status,
            started
        );
    }
    let _ = writeln!(out, "\nPage {} of {}", page.index + 1, page.count);
    out
}

pub fn battery(status: Option<&BatteryStatus>) -> String {
    let Some(status) = status else {
        return "No battery detected.\n".to_string();
    };

    let mut out = format!(
        "Battery    {}% ({})\nState      {}\nRemaining  {}\n",
        status.percent,
        match BatteryLevel::from_percent(status.percent) {
            BatteryLevel::Good => "good",
            BatteryLevel::Medium => "medium",
            BatteryLevel::Low => "low",
        },
        if status.charging { "charging" } else { "discharging" },
        format_remaining(status),
    );
    if !status.charging && status.percent < 10 {
        out.push_str("CRITICAL: battery level very low. Connect to power soon.\n");
    }
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn percentage_sparkline_uses_fixed_scale() {
        assert_eq!(sparkline(Metric::Cpu, &[0.0, 50.0, 100.0]), "▁▅█");
        assert_eq!(sparkline(Metric::Cpu, &[]), "");
    }

    #[test]
    fn rate_sparkline_scales_to_window_max() {
        assert_eq!(sparkline(Metric::NetRx, &[0.0, 2048.0]), "▁█");
        assert_eq!(sparkline(Metric::NetTx, &[0.0, 0.0]), "▁▁");
    }

    #[test]
    fn formats_values_by_unit() {
        assert_eq!(format_value(Metric::Memory, 42.345), "42.3%");
        assert_eq!(format_value(Metric::NetRx, 2048.0), "2.0 KiB/s");
    }

    #[test]
    fn tick_marks_missing_metric_unavailable() {
        let at = Local.timestamp_opt(1_700_000_000, 0).unwrap();
        let reading = Reading::new(at).with(Metric::Cpu, 90.0);
        let mut history = History::new(4);
        history.record(&reading);

        let text = tick(&reading, &history, &[Metric::Cpu, Metric::Disk]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("cpu"));
        assert!(lines[1].contains("90.0% !!"));
        assert!(lines[2].starts_with("disk"));
        assert!(lines[2].contains("unavailable"));
    }

    #[test]
    fn overview_shows_physical_cores_when_known() {
        let mut cpu = CpuInfo {
            logical_cores: 8,
            physical_cores: Some(4),
            ..Default::default()
        };
        let text = overview(&HostInfo::default(), &cpu, &MemoryInfo::default(), &[]);
        assert!(text.contains("8 logical, 4 physical"));

        cpu.physical_cores = None;
        let text = overview(&HostInfo::default(), &cpu, &MemoryInfo::default(), &[]);
        assert!(text.contains("8 logical\n"));
    }

    #[test]
    fn truncates_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn low_battery_warning() {
        let status = BatteryStatus { percent: 5, charging: false, secs_left: None };
        assert!(battery(Some(&status)).contains("CRITICAL"));
        assert_eq!(battery(None), "No battery detected.\n");
    }
}
