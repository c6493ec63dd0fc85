//! # skreader Tools - 应用层共享数据结构
//!
//! **依赖原则**: 只依赖 `skreader-protocol`，不引入 USB / 驱动层
//!
//! ## 包含模块
//!
//! - `config` - TOML 配置文件（等待参数、测量配置、USB 超时）
//! - `report` - 测量结果的 JSON 报告模型

pub mod config;
pub mod report;

pub use config::{ReaderConfig, UsbSettings, WaitSettings};
pub use report::{DeviceReport, MeasurementReport};
