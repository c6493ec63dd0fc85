//! # 配置文件
//!
//! 配置文件为 TOML 格式，所有字段均可省略，缺省时使用默认值：
//!
//! ```toml
//! [measurement]
//! measuring_mode = "ambient"
//! field_of_view = "2deg"
//! exposure_time = "auto"
//! shutter_speed = "1/125"
//!
//! [wait]
//! connect_timeout_ms = 5000
//! measurement_timeout_ms = 20000
//! poll_interval_ms = 50
//!
//! [usb]
//! timeout_ms = 5000
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skreader_protocol::MeasurementConfig;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 读数工具配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// 测量前下发给设备的配置
    pub measurement: MeasurementConfig,

    /// 就绪等待参数
    pub wait: WaitSettings,

    /// USB 传输参数
    pub usb: UsbSettings,
}

impl ReaderConfig {
    /// 从文件加载配置，文件不存在时返回默认配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// 解析 TOML 文本
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// 序列化为 TOML 文本
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// 保存配置，必要时创建父目录
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }
}

/// 就绪等待参数（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitSettings {
    pub connect_timeout_ms: u64,
    pub measurement_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            measurement_timeout_ms: 20_000,
            poll_interval_ms: 50,
        }
    }
}

impl WaitSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn measurement_timeout(&self) -> Duration {
        Duration::from_millis(self.measurement_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// USB 传输参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbSettings {
    /// 单次 bulk 传输超时（毫秒）
    pub timeout_ms: u64,
}

impl Default for UsbSettings {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

impl UsbSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
