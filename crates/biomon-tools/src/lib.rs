//! # Biomon Tools - 显示端共享数据结构
//!
//! **依赖原则**: 只依赖 `biomon-protocol`，避免依赖 `biomon-driver`
//!
//! ## 包含模块
//!
//! - `series` - 温度时间序列（图表数据）
//! - `recording` - 原始数据包录制格式（用于回放）

pub mod recording;
pub mod series;

// 重新导出常用类型
pub use recording::{PacketRecording, RecordedPacket, RecordingError, RecordingMetadata};
pub use series::{SERIES_DESCRIPTION, SeriesPoint, TemperatureSeries};
