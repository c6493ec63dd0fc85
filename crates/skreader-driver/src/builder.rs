//! Builder 模式实现
//!
//! 提供链式构造 `Spectrometer` 实例的便捷方式。

use skreader_protocol::MeasurementConfig;
use skreader_usb::{RusbTransport, Transport, UsbConfig};

use crate::device::Spectrometer;
use crate::error::DriverError;
use crate::wait::WaitConfig;

/// Spectrometer Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use skreader_driver::{RusbTransport, SpectrometerBuilder, WaitConfig};
/// use std::time::Duration;
///
/// let device = SpectrometerBuilder::new()
///     .transport(RusbTransport::new())
///     .wait_config(WaitConfig {
///         measurement_timeout: Duration::from_secs(30),
///         ..Default::default()
///     })
///     .connect()
///     .unwrap();
/// println!("{}", device);
/// ```
pub struct SpectrometerBuilder<T: Transport = RusbTransport> {
    transport: Option<T>,
    measurement_config: MeasurementConfig,
    wait_config: WaitConfig,
}

impl<T: Transport> SpectrometerBuilder<T> {
    pub fn new() -> Self {
        Self {
            transport: None,
            measurement_config: MeasurementConfig::default(),
            wait_config: WaitConfig::default(),
        }
    }

    /// 使用指定的传输
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 测量配置（可选，默认为厂商推荐值）
    pub fn measurement_config(mut self, config: MeasurementConfig) -> Self {
        self.measurement_config = config;
        self
    }

    /// 等待参数（可选）
    pub fn wait_config(mut self, config: WaitConfig) -> Self {
        self.wait_config = config;
        self
    }

    /// 打开传输并创建句柄
    pub fn connect(self) -> Result<Spectrometer<T>, DriverError> {
        let transport = self.transport.ok_or(DriverError::MissingTransport)?;
        Spectrometer::connect_with(transport, self.measurement_config, self.wait_config)
    }
}

impl SpectrometerBuilder<RusbTransport> {
    /// 使用 libusb 传输
    pub fn usb(self, config: UsbConfig) -> Self {
        self.transport(RusbTransport::with_config(config))
    }
}

impl<T: Transport> Default for SpectrometerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
