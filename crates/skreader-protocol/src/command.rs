//! 命令词汇表
//!
//! 命令是 2-3 个字符的 ASCII 助记符，可带逗号分隔的参数，例如：
//!
//! ```text
//! "MN"           查询型号
//! "ST"           查询状态
//! "MMw,0"        设置测量模式
//! "SSw,0,08"     设置快门速度
//! ```
//!
//! 设备先回复 2 字节 ACK（`0x06 0x30`），再回复以命令前两字符开头的响应帧。

use crate::{ExposureTime, FieldOfView, MeasuringMode, ProtocolError, ShutterSpeed};
use std::fmt;

/// 命令已被接受的确认帧
pub const ACK: [u8; 2] = [0x06, 0x30];

/// 单次读取缓冲区大小（设备最大响应为测量结果）
pub const READ_BUFFER_SIZE: usize = crate::MEASUREMENT_DATA_MIN_LEN;

/// 支持测量配置的型号
pub const CONFIGURABLE_MODELS: [&str; 2] = ["C-7000", "C-800"];

/// 支持扩展测量配置（视场角、曝光时间）的型号
pub const EXTENDED_CONFIG_MODEL: &str = "C-7000";

/// 扩展测量配置要求的最低固件版本（不含）
pub const EXTENDED_CONFIG_MIN_FIRMWARE: i32 = 25;

/// 设备命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `FV`
    FirmwareVersion,
    /// `MN`
    ModelName,
    /// `ST`
    Status,
    /// `RT1`
    RemoteOn,
    /// `RT0`
    RemoteOff,
    /// `RM0`
    StartMeasuring,
    /// `NR`
    MeasurementResult,
    /// `MMw,<mode>`
    SetMeasuringMode(MeasuringMode),
    /// `AGw,<fov>`
    SetFieldOfView(FieldOfView),
    /// `AMw,<exposure>`
    SetExposureTime(ExposureTime),
    /// `SSw,0,<code>`
    SetShutterSpeed(ShutterSpeed),
}

impl Command {
    /// 命令助记符（不含参数）
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Command::FirmwareVersion => "FV",
            Command::ModelName => "MN",
            Command::Status => "ST",
            Command::RemoteOn => "RT1",
            Command::RemoteOff => "RT0",
            Command::StartMeasuring => "RM0",
            Command::MeasurementResult => "NR",
            Command::SetMeasuringMode(_) => "MMw",
            Command::SetFieldOfView(_) => "AGw",
            Command::SetExposureTime(_) => "AMw",
            Command::SetShutterSpeed(_) => "SSw",
        }
    }

    /// 编码为发送到 OUT 端点的 ASCII 字节
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// 响应帧中有效数据的窗口 `(offset, length)`
    ///
    /// `length == 0` 表示从 `offset` 到帧尾。偏移量从响应帧首字节算起
    /// （包含命令回显）。
    pub fn response_window(&self) -> (usize, usize) {
        match self {
            // MN@@@C-800\x00\x00...
            Command::ModelName => (5, 0),
            // FV@@@20,C36E,27,7881,...
            //              ^^ 主固件版本
            Command::FirmwareVersion => (13, 2),
            // ST + st1 st2 key
            Command::Status => (2, 3),
            _ => (0, 0),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match self {
            Command::SetMeasuringMode(mode) => write!(f, "{},{}", mnemonic, u8::from(*mode)),
            Command::SetFieldOfView(fov) => write!(f, "{},{}", mnemonic, u8::from(*fov)),
            Command::SetExposureTime(exposure) => {
                write!(f, "{},{}", mnemonic, u8::from(*exposure))
            },
            Command::SetShutterSpeed(speed) => write!(f, "{},0,{}", mnemonic, speed.code()),
            _ => f.write_str(mnemonic),
        }
    }
}

/// 型号名称：截断到第一个 NUL 字节
pub fn parse_model_name(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// 主固件版本：带符号的十进制 ASCII 整数
pub fn parse_firmware_version(data: &[u8]) -> Result<i32, ProtocolError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ProtocolError::ParseError(format!("firmware version is not ASCII: {:02X?}", data)))?;
    text.parse::<i32>()
        .map_err(|e| ProtocolError::ParseError(format!("firmware version {:?}: {}", text, e)))
}

/// 型号是否支持测量配置
pub fn supports_measurement_configuration(model: &str) -> bool {
    CONFIGURABLE_MODELS.contains(&model)
}

/// 型号与固件是否支持扩展测量配置
pub fn supports_extended_measurement_configuration(model: &str, firmware: i32) -> bool {
    model == EXTENDED_CONFIG_MODEL && firmware > EXTENDED_CONFIG_MIN_FIRMWARE
}
