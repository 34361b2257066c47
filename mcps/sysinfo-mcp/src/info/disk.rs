//! Disk information collection

use mcp_common::ToolResult;
use sysinfo::Disks;

use super::{bytes_to_gb, lossy, percent};
use crate::types::{DiskInfo, Partition};

/// Get disk partition information
pub fn get_disk_info(mount_point_filter: Option<&str>) -> ToolResult<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();

    let partitions = disks
        .iter()
        .map(|disk| {
            let total = disk.total_space();
            let available = disk.available_space();
            let used = total.saturating_sub(available);

            Partition {
                name: lossy(disk.name()),
                mount: lossy(disk.mount_point()),
                fs_type: lossy(disk.file_system()),
                size_gb: bytes_to_gb(total),
                used_gb: bytes_to_gb(used),
                available_gb: bytes_to_gb(available),
                usage_percent: percent(used, total),
                removable: disk.is_removable(),
            }
        })
        .collect();

    Ok(DiskInfo {
        disks: filter_by_mount(partitions, mount_point_filter),
    })
}

fn filter_by_mount(partitions: Vec<Partition>, filter: Option<&str>) -> Vec<Partition> {
    match filter {
        Some(filter) => partitions
            .into_iter()
            .filter(|p| p.mount.contains(filter))
            .collect(),
        None => partitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(mount: &str) -> Partition {
        Partition {
            name: "sda1".into(),
            mount: mount.into(),
            fs_type: "ext4".into(),
            size_gb: 100.0,
            used_gb: 40.0,
            available_gb: 60.0,
            usage_percent: 40.0,
            removable: false,
        }
    }

    #[test]
    fn test_filter_by_mount_is_partial_match() {
        let parts = vec![partition("/"), partition("/home"), partition("/boot/efi")];
        let filtered = filter_by_mount(parts.clone(), Some("boot"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].mount, "/boot/efi");
        assert_eq!(filter_by_mount(parts, None).len(), 3);
    }

    #[test]
    fn test_unmatched_filter_is_empty_list() {
        let info = get_disk_info(Some("/no/such/mount/anywhere")).unwrap();
        assert!(info.disks.is_empty());
    }
}
