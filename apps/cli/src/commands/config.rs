//! 配置管理命令
//!
//! 用于管理 CLI 配置（会话参数、显示参数）

use crate::config::{CONFIG_KEYS, CliConfig};
use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 配置项名称（如 display.color）
        key: String,

        /// 配置值
        value: String,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set { key, value } => Self::set_(path, &key, &value),

            ConfigCommand::Get { key } => Self::get_(path, &key),

            ConfigCommand::Check => Self::check_(path),
        }
    }

    fn set_(path: &Path, key: &str, value: &str) -> Result<()> {
        let mut config = CliConfig::load(path)?;
        config.set(key, value)?;
        config.save(path)?;

        println!("✅ 设置 {key} = {value}");
        Ok(())
    }

    fn get_(path: &Path, key: &str) -> Result<()> {
        let config = CliConfig::load(path)?;

        if key == "all" {
            println!("Biomon CLI 配置:");
            for key in CONFIG_KEYS {
                if let Some(value) = config.get(key) {
                    println!("  {key} = {value}");
                }
            }
            return Ok(());
        }

        match config.get(key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("未知配置项: {key}"),
        }

        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let config = CliConfig::load(path)?;

        println!("配置文件: {}", path.display());
        if !path.exists() {
            println!("  (文件不存在，使用默认配置)");
        }

        let issues = config.validate();
        if issues.is_empty() {
            println!("✅ 配置有效");
        } else {
            for issue in &issues {
                println!("⚠️  {issue}");
            }
        }

        Ok(())
    }
}
