// Tests for the crate-root types: error taxonomy, wipe kinds, device
// model, and the operation configuration defaults.

use super::*;

// ==================== CONSOLE ERROR TESTS ====================

#[test]
fn test_no_device_selected_message() {
    let err = ConsoleError::NoDeviceSelected;
    assert_eq!(err.to_string(), "No device selected for wipe operation");
}

#[test]
fn test_operation_in_progress_names_device() {
    let err = ConsoleError::OperationInProgress("D:\\".to_string());
    assert!(err.to_string().contains("already in progress"));
    assert!(err.to_string().contains("D:\\"));
}

#[test]
fn test_network_error_message() {
    let err = ConsoleError::Network("connection refused".to_string());
    assert!(err.to_string().contains("Erase service request failed"));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_malformed_response_message() {
    let err = ConsoleError::MalformedResponse("missing field".to_string());
    assert!(err.to_string().contains("Malformed response"));
}

#[test]
fn test_clipboard_error_message() {
    let err = ConsoleError::Clipboard("denied".to_string());
    assert!(err.to_string().contains("Clipboard copy failed"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: ConsoleError = io.into();
    assert!(matches!(err, ConsoleError::IoError(_)));
}

// ==================== WIPE KIND TESTS ====================

#[test]
fn test_wipe_kind_routes() {
    assert_eq!(WipeKind::Demo.route(), "safe");
    assert_eq!(WipeKind::Full.route(), "full");
}

#[test]
fn test_wipe_kind_names() {
    assert_eq!(WipeKind::Demo.as_str(), "demo");
    assert_eq!(WipeKind::Full.as_str(), "full");
}

#[test]
fn test_wipe_kind_display_labels() {
    assert_eq!(WipeKind::Demo.display_label(), "Safe");
    assert_eq!(WipeKind::Full.display_label(), "Full Destructive");
}

#[test]
fn test_wipe_kind_serde_lowercase() {
    assert_eq!(serde_json::to_string(&WipeKind::Demo).unwrap(), "\"demo\"");
    let kind: WipeKind = serde_json::from_str("\"full\"").unwrap();
    assert_eq!(kind, WipeKind::Full);
}

// ==================== DEVICE MODEL TESTS ====================

#[test]
fn test_device_serde_round_trip() {
    let device = Device {
        id: "C:\\".to_string(),
        name: "C:\\".to_string(),
        category: DeviceCategory::Drive,
        status: Some(DeviceStatus::Warning),
        details: Some("Contains system files - use with caution".to_string()),
    };

    let json = serde_json::to_string(&device).unwrap();
    let back: Device = serde_json::from_str(&json).unwrap();
    assert_eq!(back, device);
}

#[test]
fn test_device_optional_fields_omitted() {
    let device = Device {
        id: "RF8M1".to_string(),
        name: "Phone: Galaxy".to_string(),
        category: DeviceCategory::Mobile,
        status: None,
        details: None,
    };

    let json = serde_json::to_string(&device).unwrap();
    assert!(!json.contains("status"));
    assert!(!json.contains("details"));
}

#[test]
fn test_device_category_all_variants() {
    let categories = vec![
        DeviceCategory::Drive,
        DeviceCategory::Mobile,
        DeviceCategory::Removable,
        DeviceCategory::Host,
    ];
    assert_eq!(categories.len(), 4);
}

#[test]
fn test_device_status_serde_lowercase() {
    assert_eq!(
        serde_json::to_string(&DeviceStatus::Warning).unwrap(),
        "\"warning\""
    );
}

// ==================== OPERATION CONFIG TESTS ====================

#[test]
fn test_operation_config_default() {
    let config = OperationConfig::default();

    assert_eq!(config.progress_step, 10);
    assert_eq!(config.tick_period, Duration::from_millis(300));
    assert_eq!(config.progress_cap, 90);
    assert_eq!(config.cooldown, Duration::from_millis(1000));
}

#[test]
fn test_operation_config_cap_below_completion() {
    // The simulator must never reach 100 on its own.
    let config = OperationConfig::default();
    assert!(config.progress_cap < 100);
}

#[test]
fn test_operation_config_builders() {
    let config = OperationConfig::default()
        .with_tick_period(Duration::from_millis(50))
        .with_cooldown(Duration::from_millis(10))
        .with_progress_step(30);

    assert_eq!(config.tick_period, Duration::from_millis(50));
    assert_eq!(config.cooldown, Duration::from_millis(10));
    assert_eq!(config.progress_step, 30);
}
