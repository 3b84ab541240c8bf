//! Pipeline 解码循环模块
//!
//! 负责后台线程的数据包接收、解码和样本投递逻辑。
//! 数据包按到达顺序逐个解码，样本按同样顺序投递，中间不做缓冲或重排。

use crate::metrics::SessionMetrics;
use crate::session::MonitorSession;
use biomon_protocol::DecodedSample;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Pipeline 配置
///
/// # Example
///
/// ```
/// use biomon_driver::PipelineConfig;
///
/// // 使用默认配置（50ms 接收超时，256 个样本缓冲）
/// let config = PipelineConfig::default();
///
/// // 自定义配置
/// let config = PipelineConfig {
///     receive_timeout_ms: 10,
///     sample_channel_capacity: 1024,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// 数据包接收超时（毫秒）
    ///
    /// 超时只用于周期性检查运行标志，不影响解码。
    pub receive_timeout_ms: u64,
    /// 样本通道容量
    ///
    /// 通道满时解码线程阻塞等待显示端取走样本，保证不丢样本也不乱序。
    pub sample_channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            receive_timeout_ms: 50,
            sample_channel_capacity: 256,
        }
    }
}

/// 解码线程循环
///
/// # 参数
/// - `packet_rx`: 原始数据包接收通道（来自传输线程）
/// - `sample_tx`: 样本发送通道（发往显示线程）
/// - `session`: 监视会话（提供经过时间）
/// - `metrics`: 共享统计计数
/// - `is_running`: 运行标志，置为 false 后循环在下一次超时检查时退出
/// - `config`: Pipeline 配置
///
/// 数据包通道断开或样本接收端被丢弃时循环结束。
pub fn decode_loop(
    packet_rx: Receiver<String>,
    sample_tx: Sender<DecodedSample>,
    session: MonitorSession,
    metrics: Arc<SessionMetrics>,
    is_running: Arc<AtomicBool>,
    config: PipelineConfig,
) {
    let receive_timeout = Duration::from_millis(config.receive_timeout_ms);

    while is_running.load(Ordering::Acquire) {
        let raw = match packet_rx.recv_timeout(receive_timeout) {
            Ok(raw) => raw,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Packet channel disconnected, decode loop exiting");
                break;
            },
        };

        match session.process_checked_at(&raw, Instant::now()) {
            Ok(sample) => {
                metrics.record_decoded();
                trace!(
                    elapsed_seconds = sample.elapsed_seconds,
                    temperature = sample.temperature_celsius,
                    "Packet decoded"
                );
                if sample_tx.send(sample).is_err() {
                    metrics.samples_undelivered.fetch_add(1, Ordering::Relaxed);
                    debug!("Sample receiver dropped, decode loop exiting");
                    break;
                }
            },
            Err(e) => {
                metrics.record_rejected(&e);
                trace!(packet = %raw, reason = %e, "Packet rejected");
            },
        }
    }
}
