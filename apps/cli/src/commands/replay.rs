//! replay 命令
//!
//! 按录制偏移把数据包重新送入新的监视会话。

use crate::config::CliConfig;
use crate::render;
use anyhow::{Context, Result};
use biomon_driver::MonitorBuilder;
use biomon_tools::{PacketRecording, TemperatureSeries};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// 最大回放速度倍数
const MAX_SPEED_FACTOR: f64 = 100.0;

/// 等待样本的超时
const SAMPLE_TIMEOUT: Duration = Duration::from_millis(500);

/// 回放命令参数
#[derive(Args, Debug)]
pub struct ReplayCommand {
    /// 录制文件路径
    #[arg(short, long)]
    pub input: PathBuf,

    /// 回放速度倍数（1.0 = 正常速度）
    #[arg(short, long, default_value_t = 1.0)]
    pub speed: f64,

    /// 只输出会话摘要，不逐行渲染
    #[arg(short, long)]
    pub quiet: bool,

    /// 禁用着色
    #[arg(long)]
    pub no_color: bool,
}

impl ReplayCommand {
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        if !(self.speed > 0.0 && self.speed <= MAX_SPEED_FACTOR) {
            anyhow::bail!(
                "❌ 速度倍数必须在 (0, {MAX_SPEED_FACTOR}] 范围内，当前: {:.2}",
                self.speed
            );
        }

        let recording = PacketRecording::load(&self.input)
            .with_context(|| format!("❌ 无法读取录制文件: {}", self.input.display()))?;

        eprintln!("📁 文件: {}", self.input.display());
        eprintln!("📡 来源: {}", recording.metadata.source);
        eprintln!("📦 数据包: {}", recording.packet_count());
        eprintln!("⚡ 速度: {:.2}x", self.speed);

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        ctrlc::set_handler(move || {
            eprintln!();
            eprintln!("🛑 收到停止信号，正在结束回放...");
            running_clone.store(false, Ordering::SeqCst);
        })
        .context("注册 Ctrl-C 处理器失败")?;

        let color = render::color_enabled(config.display.color, self.no_color);
        let mut series = match config.display.series_capacity {
            0 => TemperatureSeries::new(),
            capacity => TemperatureSeries::with_capacity(capacity),
        };

        let mut monitor = MonitorBuilder::new().pipeline_config(config.pipeline_config()).build()?;
        let samples = monitor.samples();
        let replay_start = Instant::now();

        for packet in &recording.packets {
            if !running.load(Ordering::SeqCst) {
                break;
            }

            let due = Duration::try_from_secs_f64(packet.offset_ms as f64 / 1000.0 / self.speed)
                .with_context(|| {
                    format!(
                        "❌ 速度倍数 {} 下偏移 {} ms 超出可表示的时长",
                        self.speed, packet.offset_ms
                    )
                })?;
            if let Some(wait) = due.checked_sub(replay_start.elapsed()) {
                thread::sleep(wait);
            }

            monitor.feed(packet.raw.as_str())?;

            // 渲染已经就绪的样本，保持输出与送入节奏一致
            for sample in samples.try_iter() {
                series.push_sample(&sample);
                if !self.quiet {
                    println!("{}", render::dashboard_line(&sample, color));
                }
            }
        }

        // 关闭入口，取完积压的样本
        monitor.close_input();
        while let Ok(sample) = samples.recv_timeout(SAMPLE_TIMEOUT) {
            series.push_sample(&sample);
            if !self.quiet {
                println!("{}", render::dashboard_line(&sample, color));
            }
        }
        debug!("Replay drained after {:?}", replay_start.elapsed());

        let metrics = monitor.metrics();
        monitor.shutdown();

        eprint!("{}", render::summary(&series, &metrics));
        eprintln!("✅ 回放完成");

        Ok(())
    }
}
