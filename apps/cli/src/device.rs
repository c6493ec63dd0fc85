//! 设备连接与测量来源

use anyhow::{Context, Result};
use skreader_driver::{RusbTransport, Spectrometer, SpectrometerBuilder, UsbConfig, WaitConfig};
use skreader_protocol::Measurement;
use skreader_protocol::sample::sample_measurement_data;
use skreader_tools::ReaderConfig;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// 配置文件默认路径
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Cannot determine config directory")?;
    path.push("skreader");
    path.push("config.toml");
    Ok(path)
}

/// 命令执行上下文
#[derive(Debug, Clone)]
pub struct AppContext {
    pub fake_device: bool,
    pub config_path: PathBuf,
}

impl AppContext {
    pub fn new(fake_device: bool, config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => default_config_path()?,
        };
        Ok(Self {
            fake_device,
            config_path,
        })
    }

    pub fn load_config(&self) -> Result<ReaderConfig> {
        ReaderConfig::load(&self.config_path)
    }

    /// 按配置文件连接第一台设备
    pub fn connect(&self) -> Result<Spectrometer> {
        let config = self.load_config()?;
        debug!("Using config {}", self.config_path.display());

        let device = SpectrometerBuilder::<RusbTransport>::new()
            .usb(UsbConfig {
                timeout: config.usb.timeout(),
                ..Default::default()
            })
            .measurement_config(config.measurement)
            .wait_config(WaitConfig {
                connect_timeout: config.wait.connect_timeout(),
                measurement_timeout: config.wait.measurement_timeout(),
                poll_interval: config.wait.poll_interval(),
            })
            .connect()
            .context("Failed to connect to SEKONIC device")?;

        info!("Connected to {}", device);
        Ok(device)
    }
}

/// 解码内置样本数据
pub fn sample_measurement() -> Result<Measurement> {
    Measurement::decode(&sample_measurement_data()).context("Failed to decode sample data")
}

/// 当前 Unix 时间戳（秒）
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
