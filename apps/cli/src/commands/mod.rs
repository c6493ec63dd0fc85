//! 命令定义和实现

pub mod config;
pub mod info;
pub mod json;
pub mod measure;

pub use config::ConfigCommand;
pub use json::JsonCommand;
pub use measure::MeasureCommand;
