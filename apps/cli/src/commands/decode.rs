//! decode 命令
//!
//! 解码单个数据包并输出仪表盘行或 JSON。

use crate::config::CliConfig;
use crate::render;
use anyhow::Result;
use biomon_protocol::PacketDecoder;
use clap::Args;

/// 解码命令参数
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// 原始数据包（如 "D;27.5;1;0;1;0;CICLO_AERACAO;T"）
    pub packet: String,

    /// 经过秒数
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub elapsed: i64,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,

    /// 禁用着色
    #[arg(long)]
    pub no_color: bool,
}

impl DecodeCommand {
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let sample = match PacketDecoder::new().decode_checked(&self.packet, self.elapsed) {
            Ok(sample) => sample,
            Err(e) => anyhow::bail!("❌ 数据包被拒绝: {e}"),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&sample)?);
        } else {
            let color = render::color_enabled(config.display.color, self.no_color);
            println!("{}", render::dashboard_line(&sample, color));
        }

        Ok(())
    }
}
