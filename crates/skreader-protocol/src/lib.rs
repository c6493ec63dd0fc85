//! # skreader Protocol
//!
//! SEKONIC 分光照度计 USB 协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `command`: ASCII 命令助记符、参数编码与响应数据窗口
//! - `config`: 测量配置（测量模式、视场角、曝光时间、快门速度）
//! - `state`: 设备状态字节（ST 命令）位域解析
//! - `value`: 带量程校验的十进制数值 `DecimalValue`
//! - `measurement`: 测量结果（NR 命令）二进制解码
//! - `sample`: 规范样本数据（用于回归测试与 fake 设备）
//!
//! ## 字节序
//!
//! 测量结果中的浮点字段为 IEEE-754 大端字节序（binary32 / binary64）。

pub mod command;
pub mod config;
pub mod measurement;
pub mod sample;
pub mod state;
pub mod value;

// 重新导出常用类型
pub use command::*;
pub use config::*;
pub use measurement::*;
pub use state::*;
pub use value::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid measurement data size: expected at least {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// 从大端字节读取 binary32，并扩展为 f64
///
/// 调用方负责保证 `offset + 4 <= data.len()`。
pub fn f32_from_be_at(data: &[u8], offset: usize) -> f64 {
    let bytes = [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]];
    f64::from(f32::from_be_bytes(bytes))
}

/// 从大端字节读取 binary64
///
/// 调用方负责保证 `offset + 8 <= data.len()`。
pub fn f64_from_be_at(data: &[u8], offset: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    f64::from_be_bytes(bytes)
}
