//! 监视器实现
//!
//! 持有会话、后台解码线程以及进出两个通道。

use crate::error::DriverError;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::pipeline::{PipelineConfig, decode_loop};
use crate::session::MonitorSession;
use biomon_protocol::DecodedSample;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// 关闭时等待解码线程退出的最长时间
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// 监视器
///
/// 传输侧通过 [`feed`](Self::feed) 或 [`packet_sender`](Self::packet_sender)
/// 送入原始数据包，显示侧通过 [`samples`](Self::samples) 等方法按到达顺序取出样本。
///
/// # Example
///
/// ```
/// use biomon_driver::Monitor;
/// use std::time::Duration;
///
/// let monitor = Monitor::new().unwrap();
/// monitor.feed("D;27.5;1;0;1;0;CICLO_AERACAO;T").unwrap();
///
/// let sample = monitor.recv_sample_timeout(Duration::from_secs(1)).unwrap();
/// assert_eq!(sample.cycle_label, "CICLO_AERACAO");
/// ```
pub struct Monitor {
    /// 数据包入口（关闭后为 None）
    packet_tx: Option<Sender<String>>,
    /// 样本出口
    sample_rx: Receiver<DecodedSample>,
    /// 会话（只读副本，开始时间与解码线程一致）
    session: MonitorSession,
    metrics: Arc<SessionMetrics>,
    is_running: Arc<AtomicBool>,
    decode_thread: Option<JoinHandle<()>>,
}

impl Monitor {
    /// 使用默认配置创建监视器，会话从此刻开始计时
    pub fn new() -> Result<Self, DriverError> {
        Self::spawn(MonitorSession::new(), PipelineConfig::default())
    }

    /// 使用指定会话和配置启动解码线程
    pub fn spawn(session: MonitorSession, config: PipelineConfig) -> Result<Self, DriverError> {
        let (packet_tx, packet_rx) = unbounded::<String>();
        let (sample_tx, sample_rx) = bounded::<DecodedSample>(config.sample_channel_capacity);
        let metrics = Arc::new(SessionMetrics::new());
        let is_running = Arc::new(AtomicBool::new(true));

        let decode_thread = {
            let session = session.clone();
            let metrics = metrics.clone();
            let is_running = is_running.clone();
            thread::Builder::new()
                .name("biomon-decode".to_string())
                .spawn(move || decode_loop(packet_rx, sample_tx, session, metrics, is_running, config))
                .map_err(|e| DriverError::IoThread(e.to_string()))?
        };

        debug!("Decode thread started");

        Ok(Self {
            packet_tx: Some(packet_tx),
            sample_rx,
            session,
            metrics,
            is_running,
            decode_thread: Some(decode_thread),
        })
    }

    /// 送入一个原始数据包
    pub fn feed(&self, raw: impl Into<String>) -> Result<(), DriverError> {
        let tx = self.packet_tx.as_ref().ok_or(DriverError::ChannelClosed)?;
        tx.send(raw.into()).map_err(|_| DriverError::ChannelClosed)
    }

    /// 获取数据包入口的副本（交给传输线程）
    ///
    /// 所有副本和监视器自身的入口都关闭后，解码线程处理完积压的数据包即退出。
    pub fn packet_sender(&self) -> Result<Sender<String>, DriverError> {
        self.packet_tx.clone().ok_or(DriverError::ChannelClosed)
    }

    /// 关闭监视器自身持有的数据包入口
    ///
    /// 之后 [`feed`](Self::feed) 返回 `ChannelClosed`，
    /// 已通过 [`packet_sender`](Self::packet_sender) 分发的副本不受影响。
    pub fn close_input(&mut self) {
        self.packet_tx = None;
    }

    /// 非阻塞地取出一个样本
    pub fn try_recv_sample(&self) -> Result<Option<DecodedSample>, DriverError> {
        match self.sample_rx.try_recv() {
            Ok(sample) => Ok(Some(sample)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(DriverError::ChannelClosed),
        }
    }

    /// 等待一个样本，最多等待 `timeout`
    pub fn recv_sample_timeout(&self, timeout: Duration) -> Result<DecodedSample, DriverError> {
        self.sample_rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => DriverError::Timeout,
            RecvTimeoutError::Disconnected => DriverError::ChannelClosed,
        })
    }

    /// 样本出口的副本（交给显示线程）
    ///
    /// 解码线程退出后迭代自然结束。
    pub fn samples(&self) -> Receiver<DecodedSample> {
        self.sample_rx.clone()
    }

    /// 会话
    pub fn session(&self) -> &MonitorSession {
        &self.session
    }

    /// 当前经过的整秒数
    pub fn elapsed_seconds(&self) -> i64 {
        self.session.elapsed_seconds()
    }

    /// 统计快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// 解码线程是否仍在运行
    pub fn is_running(&self) -> bool {
        self.decode_thread.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 停止解码线程并等待其退出
    ///
    /// 尚未取走的样本会被丢弃。
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // 使用 Release 确保之前的写入对解码线程可见
        self.is_running.store(false, Ordering::Release);
        self.packet_tx = None;

        let Some(handle) = self.decode_thread.take() else {
            return;
        };

        // 解码线程可能阻塞在已满的样本通道上，边等待边清空
        let deadline = Instant::now() + SHUTDOWN_TIMEOUT;
        while !handle.is_finished() && Instant::now() < deadline {
            while self.sample_rx.try_recv().is_ok() {}
            thread::sleep(Duration::from_millis(1));
        }

        if !handle.is_finished() {
            error!(
                "Decode thread failed to shut down within {:?}",
                SHUTDOWN_TIMEOUT
            );
            return;
        }

        if handle.join().is_err() {
            error!("Decode thread panicked");
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_and_receive() {
        let monitor = Monitor::new().unwrap();
        monitor.feed("D;27.5;1;0;1;0;CICLO_AERACAO;T").unwrap();

        let sample = monitor.recv_sample_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(sample.temperature_celsius, 27.5);
        assert_eq!(sample.actuators.as_array(), &[true, false, true, false]);
        assert!(sample.elapsed_seconds >= 0);
    }

    #[test]
    fn test_rejected_packet_yields_nothing() {
        let monitor = Monitor::new().unwrap();
        monitor.feed("X;1;2;3;T").unwrap();

        assert!(matches!(
            monitor.recv_sample_timeout(Duration::from_millis(100)),
            Err(DriverError::Timeout)
        ));
        assert_eq!(monitor.metrics().framing_rejected, 1);
    }

    #[test]
    fn test_close_input_ends_sample_stream() {
        let mut monitor = Monitor::new().unwrap();
        monitor.feed("D;20;0;0;0;0;A;T").unwrap();
        monitor.feed("D;21;0;0;0;0;B;T").unwrap();
        monitor.close_input();

        assert!(matches!(monitor.feed("D;22;0;0;0;0;C;T"), Err(DriverError::ChannelClosed)));

        let labels: Vec<String> = monitor.samples().iter().map(|s| s.cycle_label).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert!(matches!(monitor.try_recv_sample(), Err(DriverError::ChannelClosed)));
    }

    #[test]
    fn test_shutdown_with_full_sample_channel() {
        let config = PipelineConfig {
            receive_timeout_ms: 5,
            sample_channel_capacity: 1,
        };
        let monitor = Monitor::spawn(MonitorSession::new(), config).unwrap();
        for _ in 0..10 {
            monitor.feed("D;20;0;0;0;0;C;T").unwrap();
        }
        // 没有人读取样本，关闭也必须及时完成
        let start = Instant::now();
        monitor.shutdown();
        assert!(start.elapsed() < SHUTDOWN_TIMEOUT);
    }

    #[test]
    fn test_is_running() {
        let mut monitor = Monitor::new().unwrap();
        assert!(monitor.is_running());
        monitor.stop();
        assert!(!monitor.is_running());
    }
}
