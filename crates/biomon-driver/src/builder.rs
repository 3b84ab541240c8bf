//! Builder 模式实现
//!
//! 提供链式构造 `Monitor` 实例的便捷方式。

use crate::error::DriverError;
use crate::monitor::Monitor;
use crate::pipeline::PipelineConfig;
use crate::session::MonitorSession;
use biomon_protocol::PacketDecoder;
use std::time::Instant;

/// Monitor Builder（链式构造）
///
/// # Example
///
/// ```
/// use biomon_driver::{MonitorBuilder, PipelineConfig};
///
/// // 使用默认配置
/// let monitor = MonitorBuilder::new().build().unwrap();
///
/// // 自定义 Pipeline 配置
/// let config = PipelineConfig {
///     receive_timeout_ms: 10,
///     sample_channel_capacity: 1024,
/// };
/// let monitor = MonitorBuilder::new()
///     .pipeline_config(config)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MonitorBuilder {
    /// Pipeline 配置
    pipeline_config: Option<PipelineConfig>,
    /// 解码器
    decoder: Option<PacketDecoder>,
    /// 会话开始时间（默认为 build 时刻）
    started_at: Option<Instant>,
}

impl MonitorBuilder {
    /// 创建新的 Builder
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置 Pipeline 配置（可选）
    pub fn pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.pipeline_config = Some(config);
        self
    }

    /// 设置解码器（可选）
    pub fn decoder(mut self, decoder: PacketDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// 指定会话开始时间（可选，回放时用于对齐录制起点）
    pub fn started_at(mut self, start: Instant) -> Self {
        self.started_at = Some(start);
        self
    }

    /// 构建 Monitor 并启动解码线程
    pub fn build(self) -> Result<Monitor, DriverError> {
        let decoder = self.decoder.unwrap_or_default();
        let session = match self.started_at {
            Some(start) => MonitorSession::started_at(start, decoder),
            None => MonitorSession::with_decoder(decoder),
        };

        Monitor::spawn(session, self.pipeline_config.unwrap_or_default())
    }
}
