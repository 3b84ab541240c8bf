//! # Biomon CLI
//!
//! Command-line monitor for bioreactor telemetry packets.
//!
//! ## 使用方式
//!
//! ```bash
//! # 解码单个数据包
//! biomon-cli decode "D;27.5;1;0;1;0;CICLO_AERACAO;T" --elapsed 12
//!
//! # 从串口/蓝牙设备节点实时监视，同时录制
//! biomon-cli monitor --input /dev/rfcomm0 --record session.bin
//!
//! # 回放录制
//! biomon-cli replay --input session.bin --speed 4
//!
//! # 生成模拟数据并监视
//! biomon-cli simulate --count 60 | biomon-cli monitor
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod render;

use commands::{ConfigCommand, DecodeCommand, MonitorCommand, ReplayCommand, SimulateCommand};
use config::CliConfig;

/// Biomon CLI - 反应器遥测监视工具
#[derive(Parser, Debug)]
#[command(name = "biomon-cli")]
#[command(about = "Command-line monitor for bioreactor telemetry packets", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认: <config_dir>/biomon/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 解码单个数据包
    Decode {
        #[command(flatten)]
        args: DecodeCommand,
    },

    /// 从文件、设备节点或标准输入实时监视
    Monitor {
        #[command(flatten)]
        args: MonitorCommand,
    },

    /// 回放录制
    Replay {
        #[command(flatten)]
        args: ReplayCommand,
    },

    /// 输出模拟数据包
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，stdout 留给数据）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("biomon_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_file()?,
    };

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config_path),

        Commands::Decode { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(&config)
        },

        Commands::Monitor { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(&config)
        },

        Commands::Replay { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(&config)
        },

        Commands::Simulate { args } => args.execute(),
    }
}
