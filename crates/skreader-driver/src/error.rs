//! 驱动层错误类型定义

use skreader_protocol::{ProtocolError, RingPosition};
use skreader_usb::TransportError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 传输层失败（含 0 字节读取、短写）
    Io,
    /// ACK 不匹配、命令回显不匹配
    Protocol,
    /// 响应过短、数值无法解析、测量数据长度不足
    Validation,
    /// 量程环不在 Low、测量键被按下
    Precondition,
    /// 等待就绪超时
    Timeout,
}

/// 测量配置中的单项设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSetting {
    MeasuringMode,
    ShutterSpeed,
    FieldOfView,
    ExposureTime,
}

impl fmt::Display for ConfigSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSetting::MeasuringMode => "measurement mode",
            ConfigSetting::ShutterSpeed => "shutter speed",
            ConfigSetting::FieldOfView => "field of view",
            ConfigSetting::ExposureTime => "exposure time",
        };
        f.write_str(name)
    }
}

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// IN 端点返回 0 字节
    #[error("IN endpoint returned 0 bytes")]
    EmptyRead,

    /// OUT 端点少写
    #[error("OUT endpoint wrote {written} bytes only, which is less than data size {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// 未提供传输
    #[error("No transport provided")]
    MissingTransport,

    /// 第一帧不是 ACK
    #[error("Not OK response: {}", hex::encode(.received))]
    NotAcknowledged { received: Vec<u8> },

    /// 响应帧不是当前命令的回显
    #[error("{command} command error: not command response: {}", hex::encode(.received))]
    UnexpectedEcho { command: String, received: Vec<u8> },

    /// 响应帧长度不足
    #[error("{command} command error: invalid response length {actual} (min is {min})")]
    ResponseTooShort {
        command: String,
        actual: usize,
        min: usize,
    },

    /// 响应内容无法解析
    #[error("{command} command error: invalid response: {reason}")]
    InvalidResponse { command: String, reason: String },

    /// 测量数据解码失败
    #[error("Measurement decode error: {0}")]
    Decode(#[from] ProtocolError),

    /// 量程环不在 Low 位置
    #[error("Ring is not set to low position (current: {0})")]
    RingNotLow(RingPosition),

    /// 测量键被按下
    #[error("Measuring button is pressed")]
    MeasuringButtonPressed,

    /// 等待设备就绪超时
    #[error("Timeout waiting for device to become ready ({0:?})")]
    Timeout(Duration),

    /// 测量配置下发失败
    #[error("Set measurement configuration: set {setting} error: {source}")]
    Configuration {
        setting: ConfigSetting,
        source: Box<DriverError>,
    },
}

impl DriverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DriverError::Transport(_)
            | DriverError::EmptyRead
            | DriverError::ShortWrite { .. }
            | DriverError::MissingTransport => ErrorKind::Io,
            DriverError::NotAcknowledged { .. } | DriverError::UnexpectedEcho { .. } => {
                ErrorKind::Protocol
            },
            DriverError::ResponseTooShort { .. }
            | DriverError::InvalidResponse { .. }
            | DriverError::Decode(_) => ErrorKind::Validation,
            DriverError::RingNotLow(_) | DriverError::MeasuringButtonPressed => {
                ErrorKind::Precondition
            },
            DriverError::Timeout(_) => ErrorKind::Timeout,
            DriverError::Configuration { source, .. } => source.kind(),
        }
    }

    /// 检查是否为等待就绪超时
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}
