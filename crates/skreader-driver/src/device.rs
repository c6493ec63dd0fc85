//! 设备控制器
//!
//! 每条命令的交互固定为三步：写命令、读 ACK、读响应帧。三步在同一把锁内
//! 完成，因此同一句柄上最多只有一条命令在途。多条命令组成的流程
//! （如 [`Spectrometer::measure`]）不是原子的，并发调用可能在命令边界交错。

use parking_lot::Mutex;
use skreader_protocol::{
    ACK, Command, DeviceState, Measurement, MeasurementConfig, READ_BUFFER_SIZE,
    parse_firmware_version, parse_model_name, supports_extended_measurement_configuration,
    supports_measurement_configuration,
};
use skreader_usb::{RusbTransport, Transport, TransportError};
use std::fmt;
use tracing::{debug, trace, warn};

use crate::error::{ConfigSetting, DriverError};
use crate::wait::WaitConfig;

/// 设备名称缺失时使用的默认名称
pub const DEFAULT_DEVICE_NAME: &str = "SEKONIC";

/// 分光照度计句柄
///
/// 独占一个传输实例；`close()` 或 drop 时释放。
pub struct Spectrometer<T: Transport = RusbTransport> {
    transport: Mutex<T>,
    manufacturer: String,
    product: String,
    measurement_config: MeasurementConfig,
    wait_config: WaitConfig,
    closed: bool,
}

impl Spectrometer<RusbTransport> {
    /// 打开第一台连接的 SEKONIC 设备
    pub fn open_usb() -> Result<Self, DriverError> {
        Self::connect(RusbTransport::new())
    }
}

impl<T: Transport> Spectrometer<T> {
    /// 打开传输并读取设备描述信息，使用默认测量配置
    pub fn connect(transport: T) -> Result<Self, DriverError> {
        Self::connect_with(transport, MeasurementConfig::default(), WaitConfig::default())
    }

    pub(crate) fn connect_with(
        mut transport: T,
        measurement_config: MeasurementConfig,
        wait_config: WaitConfig,
    ) -> Result<Self, DriverError> {
        transport.open()?;

        let (manufacturer, product) = match read_descriptors(&mut transport) {
            Ok(names) => names,
            Err(e) => {
                if let Err(close_err) = transport.close() {
                    warn!("Failed to close transport after connect error: {}", close_err);
                }
                return Err(e.into());
            },
        };

        debug!("Connected to '{}' '{}'", manufacturer, product);

        Ok(Self {
            transport: Mutex::new(transport),
            manufacturer,
            product,
            measurement_config,
            wait_config,
            closed: false,
        })
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    /// 可读的设备名称
    pub fn name(&self) -> String {
        match (self.manufacturer.is_empty(), self.product.is_empty()) {
            (false, false) => format!("{} {}", self.manufacturer, self.product),
            (false, true) => self.manufacturer.clone(),
            (true, false) => self.product.clone(),
            (true, true) => DEFAULT_DEVICE_NAME.to_string(),
        }
    }

    pub fn measurement_config(&self) -> MeasurementConfig {
        self.measurement_config
    }

    pub fn set_measurement_config(&mut self, config: MeasurementConfig) {
        self.measurement_config = config;
    }

    pub fn wait_config(&self) -> WaitConfig {
        self.wait_config
    }

    pub fn set_wait_config(&mut self, config: WaitConfig) {
        self.wait_config = config;
    }

    /// 执行一条命令并返回响应帧中 `[offset, offset + length)` 的数据
    ///
    /// `length == 0` 时返回从 `offset` 到帧尾的全部数据。
    pub fn execute_command(
        &self,
        command: &Command,
        offset: usize,
        length: usize,
    ) -> Result<Vec<u8>, DriverError> {
        let frame = command.encode();
        let mut transport = self.transport.lock();

        debug!("Executing command {}", command);
        write_frame(&mut *transport, &frame)?;

        let ack = read_frame(&mut *transport)?;
        if ack != ACK {
            return Err(DriverError::NotAcknowledged { received: ack });
        }

        let mut payload = read_frame(&mut *transport)?;
        trace!("{} response: {}", command, hex::encode(&payload));

        let min = offset + length;
        if payload.len() < min {
            return Err(DriverError::ResponseTooShort {
                command: command.to_string(),
                actual: payload.len(),
                min,
            });
        }

        // 部分命令的第三个回显字符会变化，只比较前两个
        if payload.len() < 2 || payload[..2] != frame[..2] {
            return Err(DriverError::UnexpectedEcho {
                command: command.to_string(),
                received: payload,
            });
        }

        payload.drain(..offset);
        if length > 0 {
            payload.truncate(length);
        }
        Ok(payload)
    }

    fn query(&self, command: Command) -> Result<Vec<u8>, DriverError> {
        let (offset, length) = command.response_window();
        self.execute_command(&command, offset, length)
    }

    /// 型号名称（如 `C-7000`）
    pub fn model_name(&self) -> Result<String, DriverError> {
        let data = self.query(Command::ModelName)?;
        Ok(parse_model_name(&data))
    }

    /// 主固件版本
    pub fn firmware_version(&self) -> Result<i32, DriverError> {
        let data = self.query(Command::FirmwareVersion)?;
        parse_firmware_version(&data).map_err(|e| DriverError::InvalidResponse {
            command: Command::FirmwareVersion.to_string(),
            reason: e.to_string(),
        })
    }

    /// 当前设备状态快照
    pub fn state(&self) -> Result<DeviceState, DriverError> {
        let data = self.query(Command::Status)?;
        let state = DeviceState::from_bytes(data[0], data[1], data[2]);
        trace!("Device state: {:?}", state);
        Ok(state)
    }

    pub fn set_remote_on(&self) -> Result<(), DriverError> {
        self.query(Command::RemoteOn).map(drop)
    }

    pub fn set_remote_off(&self) -> Result<(), DriverError> {
        self.query(Command::RemoteOff).map(drop)
    }

    pub fn start_measuring(&self) -> Result<(), DriverError> {
        self.query(Command::StartMeasuring).map(drop)
    }

    /// 读取并解码最近一次测量结果
    pub fn measurement_result(&self) -> Result<Measurement, DriverError> {
        let data = self.query(Command::MeasurementResult)?;
        Ok(Measurement::decode(&data)?)
    }

    /// 型号是否支持测量配置（查询失败视为不支持）
    pub fn supports_measurement_configuration(&self) -> bool {
        match self.model_name() {
            Ok(model) => supports_measurement_configuration(&model),
            Err(e) => {
                debug!("Model query failed, assuming no configuration support: {}", e);
                false
            },
        }
    }

    /// 型号与固件是否支持扩展测量配置（查询失败视为不支持）
    pub fn supports_extended_measurement_configuration(&self) -> bool {
        let model = self.model_name().unwrap_or_default();
        let firmware = self.firmware_version().unwrap_or(0);
        supports_extended_measurement_configuration(&model, firmware)
    }

    /// 下发测量配置
    ///
    /// 不支持配置的型号直接跳过；扩展配置（视场角、曝光时间）仅在支持时下发。
    pub fn set_measurement_configuration(&self) -> Result<(), DriverError> {
        if !self.supports_measurement_configuration() {
            debug!("{} does not support measurement configuration", self.name());
            return Ok(());
        }

        let config = self.measurement_config;
        self.apply_setting(
            ConfigSetting::MeasuringMode,
            Command::SetMeasuringMode(config.measuring_mode),
        )?;
        self.apply_setting(
            ConfigSetting::ShutterSpeed,
            Command::SetShutterSpeed(config.shutter_speed),
        )?;

        if !self.supports_extended_measurement_configuration() {
            return Ok(());
        }

        self.apply_setting(
            ConfigSetting::FieldOfView,
            Command::SetFieldOfView(config.field_of_view),
        )?;
        self.apply_setting(
            ConfigSetting::ExposureTime,
            Command::SetExposureTime(config.exposure_time),
        )
    }

    fn apply_setting(&self, setting: ConfigSetting, command: Command) -> Result<(), DriverError> {
        self.query(command)
            .map(drop)
            .map_err(|e| DriverError::Configuration {
                setting,
                source: Box::new(e),
            })
    }

    /// 完成一次测量
    ///
    /// 等待空闲 → 远程模式 → 下发配置 → 开始测量 → 等待结束 → 读取结果。
    /// 任何路径退出时都会尝试关闭远程模式，关闭失败只记录日志。
    pub fn measure(&self) -> Result<Measurement, DriverError> {
        let WaitConfig {
            connect_timeout,
            measurement_timeout,
            poll_interval,
        } = self.wait_config;

        let _remote = RemoteModeGuard { device: self };

        self.wait_ready(connect_timeout, poll_interval)?;
        self.set_remote_on()?;
        self.set_measurement_configuration()?;
        self.start_measuring()?;
        self.wait_ready(measurement_timeout, poll_interval)?;
        let measurement = self.measurement_result()?;

        debug!("Measurement: {}", measurement);
        Ok(measurement)
    }

    /// 释放传输，句柄随之失效
    pub fn close(mut self) -> Result<(), DriverError> {
        self.closed = true;
        self.transport.get_mut().close()?;
        Ok(())
    }
}

impl<T: Transport> fmt::Display for Spectrometer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl<T: Transport> Drop for Spectrometer<T> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.transport.get_mut().close() {
            warn!("Failed to close transport: {}", e);
        }
    }
}

/// 作用域结束时关闭远程模式
struct RemoteModeGuard<'a, T: Transport> {
    device: &'a Spectrometer<T>,
}

impl<T: Transport> Drop for RemoteModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.device.set_remote_off() {
            warn!("Failed to switch remote mode off: {}", e);
        }
    }
}

fn read_descriptors<T: Transport>(transport: &mut T) -> Result<(String, String), TransportError> {
    Ok((transport.manufacturer()?, transport.product()?))
}

fn write_frame<T: Transport + ?Sized>(transport: &mut T, frame: &[u8]) -> Result<(), DriverError> {
    trace!("OUT {}", hex::encode(frame));
    let written = transport.write(frame)?;
    if written < frame.len() {
        return Err(DriverError::ShortWrite {
            written,
            expected: frame.len(),
        });
    }
    Ok(())
}

fn read_frame<T: Transport + ?Sized>(transport: &mut T) -> Result<Vec<u8>, DriverError> {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let n = transport.read(&mut buf)?;
    if n == 0 {
        return Err(DriverError::EmptyRead);
    }
    buf.truncate(n);
    Ok(buf)
}
