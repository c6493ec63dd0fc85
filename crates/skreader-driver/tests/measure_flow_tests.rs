//! 就绪等待、测量配置与完整测量流程测试

use skreader_driver::{ConfigSetting, DriverError, ErrorKind, Spectrometer, WaitConfig};
use skreader_protocol::sample::sample_measurement_data;
use skreader_protocol::{DeviceStatus, RingPosition};
use skreader_usb::{MockProbe, MockTransport, TransportError};
use std::time::Duration;

const POLL: Duration = Duration::from_millis(1);
const TIMEOUT: Duration = Duration::from_millis(200);

fn fast_wait() -> WaitConfig {
    WaitConfig {
        connect_timeout: TIMEOUT,
        measurement_timeout: TIMEOUT,
        poll_interval: POLL,
    }
}

fn connect(product: &str) -> (Spectrometer<MockTransport>, MockProbe) {
    let transport = MockTransport::new()
        .with_manufacturer("SEKONIC")
        .with_product(product);
    let probe = transport.probe();
    let mut device = Spectrometer::connect(transport).expect("mock connect");
    device.set_wait_config(fast_wait());
    (device, probe)
}

fn push_status(probe: &MockProbe, st1: u8, st2: u8, key: u8) {
    probe.push_response(vec![b'S', b'T', st1, st2, key]);
}

fn push_idle(probe: &MockProbe) {
    push_status(probe, 0x00, 0x00, 0x40);
}

fn push_model(probe: &MockProbe, model: &str) {
    let mut payload = b"MN@@@".to_vec();
    payload.extend_from_slice(model.as_bytes());
    payload.push(0);
    probe.push_response(payload);
}

fn push_firmware(probe: &MockProbe, version: &str) {
    probe.push_response(format!("FV@@@20,C36E,{},7881", version).into_bytes());
}

// ============================================================================
// wait_ready
// ============================================================================

#[test]
fn test_wait_ready_idle() {
    let (device, probe) = connect("C-7000");
    push_idle(&probe);

    let state = device.wait_ready(TIMEOUT, POLL).unwrap();
    assert_eq!(state.status, DeviceStatus::Idle);
    assert_eq!(probe.written_commands(), vec!["ST"]);
}

#[test]
fn test_wait_ready_out_of_range_counts_as_ready() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x08, 0x00, 0x40);

    let state = device.wait_ready(TIMEOUT, POLL).unwrap();
    assert_eq!(state.status, DeviceStatus::IdleOutOfMeasuringRange);
}

#[test]
fn test_wait_ready_busy_without_sub_state_is_ready() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x01, 0x00, 0x40);

    let state = device.wait_ready(TIMEOUT, POLL).unwrap();
    assert_eq!(state.status, DeviceStatus::Idle);
    assert_eq!(probe.written_commands(), vec!["ST"]);
    assert_eq!(probe.pending_reads(), 0);
}

#[test]
fn test_wait_ready_polls_until_idle() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x01, 0x01, 0x40);
    push_status(&probe, 0x01, 0x08, 0x40);
    push_idle(&probe);

    device.wait_ready(TIMEOUT, POLL).unwrap();
    assert_eq!(probe.written_commands(), vec!["ST", "ST", "ST"]);
    assert_eq!(probe.pending_reads(), 0);
}

#[test]
fn test_wait_ready_ignores_transient_errors() {
    let (device, probe) = connect("C-7000");
    probe.push_read_error(TransportError::Device("stall".to_string()));
    probe.push_response(b"XX@@@".to_vec());
    push_idle(&probe);

    assert!(device.wait_ready(TIMEOUT, POLL).is_ok());
}

#[test]
fn test_wait_ready_timeout() {
    let (device, _probe) = connect("C-7000");

    let err = device.wait_ready(Duration::from_millis(20), POLL).unwrap_err();
    assert!(matches!(err, DriverError::Timeout(t) if t == Duration::from_millis(20)));
    assert!(err.is_timeout());
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[test]
fn test_wait_ready_ring_not_low() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x00, 0x00, 0x60);
    push_idle(&probe);

    let err = device.wait_ready(TIMEOUT, POLL).unwrap_err();
    assert!(matches!(err, DriverError::RingNotLow(RingPosition::High)));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(probe.pending_reads(), 2);
}

#[test]
fn test_wait_ready_measuring_button_pressed() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x00, 0x00, 0x42);

    let err = device.wait_ready(TIMEOUT, POLL).unwrap_err();
    assert!(matches!(err, DriverError::MeasuringButtonPressed));
    assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[test]
fn test_wait_ready_other_buttons_are_ignored() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x00, 0x00, 0x40 | 0x02 | 0x04);

    assert!(device.wait_ready(TIMEOUT, POLL).is_ok());
}

// ============================================================================
// 测量配置
// ============================================================================

#[test]
fn test_capabilities() {
    let (device, probe) = connect("C-7000");

    push_model(&probe, "C-800");
    assert!(device.supports_measurement_configuration());

    push_model(&probe, "C-700");
    assert!(!device.supports_measurement_configuration());

    probe.push_read_error(TransportError::Device("stall".to_string()));
    assert!(!device.supports_measurement_configuration());

    push_model(&probe, "C-7000");
    push_firmware(&probe, "27");
    assert!(device.supports_extended_measurement_configuration());

    push_model(&probe, "C-7000");
    push_firmware(&probe, "25");
    assert!(!device.supports_extended_measurement_configuration());

    push_model(&probe, "C-7000");
    push_firmware(&probe, "-1");
    assert!(!device.supports_extended_measurement_configuration());

    push_model(&probe, "C-800");
    push_firmware(&probe, "30");
    assert!(!device.supports_extended_measurement_configuration());
}

#[test]
fn test_set_configuration_extended() {
    let (device, probe) = connect("C-7000");
    push_model(&probe, "C-7000");
    probe.push_response(b"MM".to_vec());
    probe.push_response(b"SS".to_vec());
    push_model(&probe, "C-7000");
    push_firmware(&probe, "27");
    probe.push_response(b"AG".to_vec());
    probe.push_response(b"AM".to_vec());

    device.set_measurement_configuration().unwrap();
    assert_eq!(
        probe.written_commands(),
        vec!["MN", "MMw,0", "SSw,0,08", "MN", "FV", "AGw,0", "AMw,0"]
    );
    assert_eq!(probe.pending_reads(), 0);
}

#[test]
fn test_set_configuration_basic_only() {
    let (device, probe) = connect("C-800");
    push_model(&probe, "C-800");
    probe.push_response(b"MM".to_vec());
    probe.push_response(b"SS".to_vec());
    push_model(&probe, "C-800");
    push_firmware(&probe, "30");

    device.set_measurement_configuration().unwrap();
    assert_eq!(
        probe.written_commands(),
        vec!["MN", "MMw,0", "SSw,0,08", "MN", "FV"]
    );
}

#[test]
fn test_set_configuration_unsupported_model() {
    let (device, probe) = connect("C-700");
    push_model(&probe, "C-700");

    device.set_measurement_configuration().unwrap();
    assert_eq!(probe.written_commands(), vec!["MN"]);
}

#[test]
fn test_set_configuration_failure_names_setting() {
    let (device, probe) = connect("C-7000");
    push_model(&probe, "C-7000");
    probe.push_read(vec![0x15, 0x30]);

    let err = device.set_measurement_configuration().unwrap_err();
    assert!(matches!(
        err,
        DriverError::Configuration {
            setting: ConfigSetting::MeasuringMode,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(
        err.to_string()
            .starts_with("Set measurement configuration: set measurement mode error:")
    );
}

// ============================================================================
// measure()
// ============================================================================

#[test]
fn test_measure_full_flow() {
    let (device, probe) = connect("C-7000");
    push_idle(&probe);
    probe.push_response(b"RT@".to_vec());
    push_model(&probe, "C-7000");
    probe.push_response(b"MM".to_vec());
    probe.push_response(b"SS".to_vec());
    push_model(&probe, "C-7000");
    push_firmware(&probe, "27");
    probe.push_response(b"AG".to_vec());
    probe.push_response(b"AM".to_vec());
    probe.push_response(b"RM@".to_vec());
    push_status(&probe, 0x03, 0x08, 0x40);
    push_idle(&probe);
    probe.push_response(sample_measurement_data());
    probe.push_response(b"RT@".to_vec());

    let measurement = device.measure().unwrap();
    assert_eq!(measurement.color_temperature.tcp.formatted, "5000");
    assert_eq!(measurement.illuminance.lux.formatted, "1230");
    assert_eq!(measurement.peak_wavelength, Some(555));

    assert_eq!(
        probe.written_commands(),
        vec![
            "ST", "RT1", "MN", "MMw,0", "SSw,0,08", "MN", "FV", "AGw,0", "AMw,0", "RM0", "ST",
            "ST", "NR", "RT0",
        ]
    );
    assert_eq!(probe.pending_reads(), 0);
}

#[test]
fn test_measure_releases_remote_mode_when_first_wait_fails() {
    let (device, probe) = connect("C-7000");
    push_status(&probe, 0x00, 0x00, 0x20);
    probe.push_response(b"RT@".to_vec());

    let err = device.measure().unwrap_err();
    assert!(matches!(err, DriverError::RingNotLow(RingPosition::Cal)));
    assert_eq!(probe.written_commands(), vec!["ST", "RT0"]);
}

#[test]
fn test_measure_releases_remote_mode_on_mid_flow_failure() {
    let (device, probe) = connect("C-700");
    push_idle(&probe);
    probe.push_response(b"RT@".to_vec());
    push_model(&probe, "C-700");
    probe.push_read(vec![0x15, 0x30]);
    probe.push_response(b"RT@".to_vec());

    let err = device.measure().unwrap_err();
    assert!(matches!(err, DriverError::NotAcknowledged { .. }));
    assert_eq!(
        probe.written_commands(),
        vec!["ST", "RT1", "MN", "RM0", "RT0"]
    );
}

#[test]
fn test_measure_rejects_short_result() {
    let (device, probe) = connect("C-700");
    push_idle(&probe);
    probe.push_response(b"RT@".to_vec());
    push_model(&probe, "C-700");
    probe.push_response(b"RM@".to_vec());
    push_idle(&probe);
    let mut data = sample_measurement_data();
    data.truncate(2000);
    probe.push_response(data);
    probe.push_response(b"RT@".to_vec());

    let err = device.measure().unwrap_err();
    assert!(matches!(err, DriverError::Decode(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(probe.written_commands().last().map(String::as_str), Some("RT0"));
}

#[test]
fn test_measure_ignores_remote_off_failure() {
    let (device, probe) = connect("C-700");
    push_idle(&probe);
    probe.push_response(b"RT@".to_vec());
    push_model(&probe, "C-700");
    probe.push_response(b"RM@".to_vec());
    push_idle(&probe);
    probe.push_response(sample_measurement_data());

    assert!(device.measure().is_ok());
    assert_eq!(probe.written_commands().last().map(String::as_str), Some("RT0"));
}
