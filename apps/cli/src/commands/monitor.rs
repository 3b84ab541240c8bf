//! monitor 命令
//!
//! 从文件、设备节点（如 `/dev/rfcomm0`）或标准输入逐行读取数据包，
//! 送入后台解码线程，并在主线程渲染每个样本。

use crate::config::CliConfig;
use crate::render;
use anyhow::{Context, Result};
use biomon_driver::{DriverError, Monitor, MonitorBuilder};
use biomon_tools::{PacketRecording, RecordingMetadata, TemperatureSeries};
use clap::Args;
use crossbeam_channel::{RecvTimeoutError, Sender};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// 主线程等待样本的间隔（用于检查停止信号）
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 监视命令参数
#[derive(Args, Debug)]
pub struct MonitorCommand {
    /// 输入路径（文件或设备节点），省略时读取标准输入
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 同时录制原始数据包到该文件
    #[arg(short, long)]
    pub record: Option<PathBuf>,

    /// 结束时导出温度序列 CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// 只输出会话摘要，不逐行渲染
    #[arg(short, long)]
    pub quiet: bool,

    /// 禁用着色
    #[arg(long)]
    pub no_color: bool,
}

impl MonitorCommand {
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let (reader, source): (Box<dyn BufRead + Send>, String) = match &self.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("❌ 无法打开输入: {}", path.display()))?;
                (Box::new(BufReader::new(file)), path.display().to_string())
            },
            None => (Box::new(BufReader::new(std::io::stdin())), "stdin".to_string()),
        };

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        ctrlc::set_handler(move || {
            eprintln!();
            eprintln!("🛑 收到停止信号，正在结束会话...");
            running_clone.store(false, Ordering::SeqCst);
        })
        .context("注册 Ctrl-C 处理器失败")?;

        let mut monitor = MonitorBuilder::new().pipeline_config(config.pipeline_config()).build()?;

        let recording = self.record.as_ref().map(|_| {
            Arc::new(Mutex::new(PacketRecording::new(RecordingMetadata {
                source: source.clone(),
                created_at_unix: unix_now(),
                note: None,
            })))
        });

        eprintln!("📡 监视中: {source}（Ctrl-C 结束）");

        // 传输线程：逐行读取，原样送入解码线程
        let packet_tx = monitor.packet_sender()?;
        monitor.close_input();
        let session_start = monitor.session().start();
        let recording_for_reader = recording.clone();
        let running_for_reader = running.clone();
        let reader_thread = thread::Builder::new()
            .name("biomon-transport".into())
            .spawn(move || {
                read_lines(
                    reader,
                    packet_tx,
                    session_start,
                    recording_for_reader,
                    running_for_reader,
                )
            })
            .context("启动传输线程失败")?;

        let series = self.render_loop(&monitor, config, &running);
        let metrics = monitor.metrics();
        monitor.shutdown();

        // stdin 读取可能阻塞，Ctrl-C 时不等待传输线程
        if reader_thread.is_finished()
            && let Ok(Err(e)) = reader_thread.join()
        {
            warn!("Transport thread stopped with error: {e}");
        }

        eprint!("{}", render::summary(&series, &metrics));

        if let Some(path) = &self.csv {
            std::fs::write(path, series.to_csv())
                .with_context(|| format!("写入 CSV 失败: {}", path.display()))?;
            eprintln!("💾 CSV 已保存: {}", path.display());
        }

        if let (Some(path), Some(recording)) = (&self.record, recording) {
            let recording = recording
                .lock()
                .map_err(|_| anyhow::anyhow!("录制数据锁已损坏"))?;
            recording.save(path)?;
            eprintln!(
                "💾 录制已保存: {} ({} 个数据包)",
                path.display(),
                recording.packet_count()
            );
        }

        Ok(())
    }

    /// 主线程：取出样本、追加到序列并渲染
    fn render_loop(&self, monitor: &Monitor, config: &CliConfig, running: &AtomicBool) -> TemperatureSeries {
        let color = render::color_enabled(config.display.color, self.no_color);
        let mut series = match config.display.series_capacity {
            0 => TemperatureSeries::new(),
            capacity => TemperatureSeries::with_capacity(capacity),
        };

        let samples = monitor.samples();
        while running.load(Ordering::SeqCst) {
            match samples.recv_timeout(POLL_INTERVAL) {
                Ok(sample) => {
                    series.push_sample(&sample);
                    if !self.quiet {
                        println!("{}", render::dashboard_line(&sample, color));
                    }
                },
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Sample channel disconnected, input exhausted");
                    break;
                },
            }
        }

        series
    }
}

/// 传输线程主体
fn read_lines(
    mut reader: Box<dyn BufRead + Send>,
    packet_tx: Sender<String>,
    session_start: Instant,
    recording: Option<Arc<Mutex<PacketRecording>>>,
    running: Arc<AtomicBool>,
) -> Result<(), DriverError> {
    let mut buf = Vec::new();
    while running.load(Ordering::Relaxed) {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| DriverError::IoThread(e.to_string()))?;
        if n == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let raw = line.trim_end_matches(['\r', '\n']).to_string();

        // 录制与实时流必须一致：录制失败时停止读取
        if let Some(recording) = &recording {
            let mut recording = recording
                .lock()
                .map_err(|_| DriverError::IoThread("recording lock poisoned".to_string()))?;
            recording.add_packet(session_start.elapsed(), raw.clone());
        }

        if packet_tx.send(raw).is_err() {
            return Err(DriverError::ChannelClosed);
        }
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
