//! # skreader Driver
//!
//! SEKONIC 分光照度计设备驱动，包括：
//! - 命令交互协议（写命令 → ACK → 响应帧）
//! - 设备状态轮询（等待就绪）
//! - 组合测量流程 `measure()`
//!
//! # Example
//!
//! ```no_run
//! use skreader_driver::Spectrometer;
//!
//! let device = Spectrometer::open_usb()?;
//! let measurement = device.measure()?;
//! println!("{}: {}", device, measurement);
//! device.close()?;
//! # Ok::<(), skreader_driver::DriverError>(())
//! ```

mod builder;
mod device;
mod error;
mod wait;

pub use builder::SpectrometerBuilder;
pub use device::{DEFAULT_DEVICE_NAME, Spectrometer};
pub use error::{ConfigSetting, DriverError, ErrorKind};
pub use skreader_usb::{RusbTransport, Transport, TransportError, UsbConfig};
pub use wait::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MEASUREMENT_TIMEOUT, DEFAULT_POLL_INTERVAL, WaitConfig,
};
