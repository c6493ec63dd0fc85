//! # skreader CLI
//!
//! SEKONIC 分光照度计命令行工具。每条命令独立完成 连接 → 执行 → 断开。
//!
//! ```bash
//! # 设备信息
//! skreader info
//!
//! # 测量并输出常用数据（LUX、CCT、ΔUv、Ra、R9）
//! skreader measure
//!
//! # 输出全部数据
//! skreader measure --all --verbose
//!
//! # JSON 报告
//! skreader json --name "Desk lamp" --note "warm white"
//!
//! # 不连接设备，使用内置样本数据
//! skreader --fake-device measure --cri
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod device;

use commands::{ConfigCommand, JsonCommand, MeasureCommand};
use device::AppContext;

/// skreader - SEKONIC 分光照度计命令行工具
#[derive(Parser, Debug)]
#[command(name = "skreader")]
#[command(about = "Command line tool for SEKONIC spectrometers remote control", long_about = None)]
#[command(version)]
struct Cli {
    /// 使用内置样本数据代替真实设备
    #[arg(short = 'f', long, global = true, visible_alias = "fake")]
    fake_device: bool,

    /// 配置文件路径（默认 `<config_dir>/skreader/config.toml`）
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 显示已连接设备的信息
    Info,

    /// 执行一次测量并输出选定数据
    Measure {
        #[command(flatten)]
        args: MeasureCommand,
    },

    /// 执行一次测量并以 JSON 输出全部数据
    Json {
        #[command(flatten)]
        args: JsonCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 日志输出到 stderr，stdout 只留给测量数据
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skreader=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.fake_device, cli.config)?;

    match cli.command {
        Commands::Info => commands::info::execute(&ctx),
        Commands::Measure { args } => args.execute(&ctx),
        Commands::Json { args } => args.execute(&ctx),
        Commands::Config(cmd) => cmd.execute(&ctx),
    }
}
