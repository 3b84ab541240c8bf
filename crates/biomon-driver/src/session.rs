//! 监视会话
//!
//! 会话在创建时记录一次开始时间，此后不再修改。
//! 每个数据包的经过秒数都从这个时间点计算，再显式传给解码器。

use biomon_protocol::{DecodeError, DecodedSample, PacketDecoder};
use std::time::Instant;

/// 监视会话
///
/// # Example
///
/// ```
/// use biomon_driver::MonitorSession;
/// use std::time::Duration;
///
/// let session = MonitorSession::new();
/// let later = session.start() + Duration::from_millis(12_900);
/// assert_eq!(session.elapsed_seconds_at(later), 12);
/// ```
#[derive(Debug, Clone)]
pub struct MonitorSession {
    start: Instant,
    decoder: PacketDecoder,
}

impl MonitorSession {
    /// 创建会话，开始时间为当前时刻
    pub fn new() -> Self {
        Self::with_decoder(PacketDecoder::new())
    }

    /// 使用指定解码器创建会话
    pub fn with_decoder(decoder: PacketDecoder) -> Self {
        Self::started_at(Instant::now(), decoder)
    }

    /// 使用指定开始时间创建会话（回放、测试）
    pub fn started_at(start: Instant, decoder: PacketDecoder) -> Self {
        Self { start, decoder }
    }

    /// 会话开始时间
    pub fn start(&self) -> Instant {
        self.start
    }

    /// 当前经过的整秒数（向下取整）
    pub fn elapsed_seconds(&self) -> i64 {
        self.elapsed_seconds_at(Instant::now())
    }

    /// 指定时刻相对开始时间经过的整秒数
    ///
    /// `now` 早于开始时间时返回 0。
    pub fn elapsed_seconds_at(&self, now: Instant) -> i64 {
        let secs = now.saturating_duration_since(self.start).as_secs();
        i64::try_from(secs).unwrap_or(i64::MAX)
    }

    /// 用当前经过时间解码一个数据包
    pub fn process(&self, raw: &str) -> Option<DecodedSample> {
        self.decoder.decode(raw, self.elapsed_seconds())
    }

    /// 用指定时刻解码一个数据包
    pub fn process_at(&self, raw: &str, now: Instant) -> Option<DecodedSample> {
        self.decoder.decode(raw, self.elapsed_seconds_at(now))
    }

    /// 用指定时刻解码，同时返回拒绝原因
    pub fn process_checked_at(&self, raw: &str, now: Instant) -> Result<DecodedSample, DecodeError> {
        self.decoder.decode_checked(raw, self.elapsed_seconds_at(now))
    }
}

impl Default for MonitorSession {
    fn default() -> Self {
        Self::new()
    }
}
