//! 配置管理命令
//!
//! 配置文件为 TOML 格式，包含测量配置、等待参数和 USB 超时。

use anyhow::{Result, bail};
use clap::Subcommand;
use skreader_tools::ReaderConfig;

use crate::device::AppContext;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置
    Show,

    /// 显示配置文件路径
    Path,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                let config = ctx.load_config()?;
                print!("{}", config.to_toml()?);
            },

            ConfigCommand::Path => println!("{}", ctx.config_path.display()),

            ConfigCommand::Init { force } => {
                let path = &ctx.config_path;
                if path.exists() && !force {
                    bail!(
                        "Config file {} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                ReaderConfig::default().save(path)?;
                println!("Wrote {}", path.display());
            },
        }
        Ok(())
    }
}
