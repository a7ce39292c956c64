use std::path::Path;
use sysinfo::Disks;
use vigil_core::state::DiskInfo;

/// All mounted filesystems with a non-zero size.
pub fn list_disks() -> Vec<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter(|d| d.total_space() > 0)
        .map(|d| DiskInfo {
            name:        d.name().to_string_lossy().into_owned(),
            mount_point: d.mount_point().to_path_buf(),
            file_system: d.file_system().to_string_lossy().into_owned(),
            total:       d.total_space(),
            used:        d.total_space().saturating_sub(d.available_space()),
        })
        .collect()
}

/// The filesystem mounted exactly at `mount`, if any.
pub fn find_mount<'a>(disks: &'a [DiskInfo], mount: &Path) -> Option<&'a DiskInfo> {
    disks.iter().find(|d| d.mount_point == mount)
}
