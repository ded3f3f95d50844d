//! Mapping of the raw device-inventory payload into console devices.
//!
//! The catalog service owns enumeration and refresh; the core only turns
//! its wire shape into [`Device`] values and hands the controller the id of
//! whichever device the operator selected.

use crate::client::DeviceInventory;
use crate::{Device, DeviceCategory, DeviceStatus};
use std::time::Duration;

/// How often the console re-polls the catalog service. The poll runs on its
/// own period and never writes into operation state.
pub const POLL_PERIOD: Duration = Duration::from_secs(5);

/// Synthetic id for the host PC entry.
pub const HOST_DEVICE_ID: &str = "pc_name";

const PHONE_DEFAULT_DETAILS: &str = "USB Debugging enabled and authorized";

/// Flatten an inventory into the display order the console uses: host
/// first, then phones, then drives.
pub fn devices_from_inventory(inventory: &DeviceInventory) -> Vec<Device> {
    let mut devices = Vec::new();

    if let Some(pc_name) = &inventory.pc_name {
        devices.push(Device {
            id: HOST_DEVICE_ID.to_string(),
            name: pc_name.clone(),
            category: DeviceCategory::Host,
            status: Some(DeviceStatus::Ready),
            details: Some("This is the current Windows PC".to_string()),
        });
    }

    for phone in &inventory.phones {
        devices.push(Device {
            id: phone.serial.clone(),
            name: format!("Phone: {}", phone.name),
            category: DeviceCategory::Mobile,
            status: Some(DeviceStatus::Ready),
            details: Some(
                phone
                    .details
                    .clone()
                    .unwrap_or_else(|| PHONE_DEFAULT_DETAILS.to_string()),
            ),
        });
    }

    for drive in &inventory.drives {
        let id = normalize_drive_id(&drive.device);
        let is_system = id.starts_with("C:");
        devices.push(Device {
            name: id.clone(),
            id,
            category: DeviceCategory::Drive,
            status: Some(if is_system {
                DeviceStatus::Warning
            } else {
                DeviceStatus::Ready
            }),
            details: Some(
                if is_system {
                    "Contains system files - use with caution"
                } else {
                    "Safe for wiping"
                }
                .to_string(),
            ),
        });
    }

    devices
}

/// Drive ids always carry a trailing backslash so they match what the erase
/// service expects as a path.
fn normalize_drive_id(device: &str) -> String {
    if device.ends_with('\\') {
        device.to_string()
    } else {
        format!("{}\\", device)
    }
}
