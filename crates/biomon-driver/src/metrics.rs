//! 解码统计模块
//!
//! 提供零开销的原子计数器，用于监控数据包链路的健康状态。
//! 所有计数器都使用原子操作，可以在任何线程安全地读取，不会引入锁竞争。

use biomon_protocol::DecodeError;
use std::sync::atomic::{AtomicU64, Ordering};

/// 会话解码统计
///
/// # 使用示例
///
/// ```rust
/// use biomon_driver::SessionMetrics;
/// use std::sync::Arc;
///
/// let metrics = Arc::new(SessionMetrics::new());
///
/// // 在解码线程中更新指标
/// metrics.record_decoded();
///
/// // 在显示线程中读取快照
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.samples_decoded, 1);
/// ```
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// 收到的数据包总数
    pub packets_total: AtomicU64,

    /// 成功解码的样本数
    pub samples_decoded: AtomicU64,

    /// 帧标记不匹配丢弃数
    pub framing_rejected: AtomicU64,

    /// 字段数不匹配丢弃数
    pub field_count_rejected: AtomicU64,

    /// 温度转换失败数
    pub conversion_failures: AtomicU64,

    /// 显示端已断开导致无法投递的样本数
    pub samples_undelivered: AtomicU64,
}

impl SessionMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功解码
    pub fn record_decoded(&self) {
        self.packets_total.fetch_add(1, Ordering::Relaxed);
        self.samples_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// 按错误类型记录一次拒绝
    pub fn record_rejected(&self, error: &DecodeError) {
        self.packets_total.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            DecodeError::FramingMismatch => &self.framing_rejected,
            DecodeError::FieldCountMismatch { .. } => &self.field_count_rejected,
            DecodeError::InvalidTemperature { .. } => &self.conversion_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    ///
    /// 不同计数器之间可能有微小的时间差，适合监控场景。
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_total: self.packets_total.load(Ordering::Relaxed),
            samples_decoded: self.samples_decoded.load(Ordering::Relaxed),
            framing_rejected: self.framing_rejected.load(Ordering::Relaxed),
            field_count_rejected: self.field_count_rejected.load(Ordering::Relaxed),
            conversion_failures: self.conversion_failures.load(Ordering::Relaxed),
            samples_undelivered: self.samples_undelivered.load(Ordering::Relaxed),
        }
    }
}

/// 指标快照（不可变，用于读取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub packets_total: u64,
    pub samples_decoded: u64,
    pub framing_rejected: u64,
    pub field_count_rejected: u64,
    pub conversion_failures: u64,
    pub samples_undelivered: u64,
}

impl MetricsSnapshot {
    /// 被拒绝的数据包总数
    pub fn rejected_total(&self) -> u64 {
        self.framing_rejected + self.field_count_rejected + self.conversion_failures
    }

    /// 成功解码率（百分比）
    ///
    /// 返回 0.0 到 100.0 之间的值。如果 `packets_total` 为 0，返回 0.0。
    pub fn acceptance_rate(&self) -> f64 {
        if self.packets_total == 0 {
            return 0.0;
        }
        (self.samples_decoded as f64 / self.packets_total as f64) * 100.0
    }
}
