//! 驱动层模块
//!
//! 本模块负责监视会话与数据包投递链路，包括：
//! - 会话开始时间与经过秒数（`MonitorSession`）
//! - 后台解码线程（通道进、通道出，保持到达顺序）
//! - 解码统计计数（原子计数器，无锁读取）
//!
//! # 使用场景
//!
//! 传输线程（蓝牙/串口读取）把原始字符串送入 [`Monitor::packet_sender`]，
//! 显示线程从 [`Monitor::samples`] 取出 `DecodedSample` 更新界面。
//! 两个上下文之间只通过通道传递消息，不共享可变状态。

mod builder;
mod error;
pub mod metrics;
mod monitor;
pub mod pipeline;
pub mod session;

pub use builder::MonitorBuilder;
pub use error::DriverError;
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use monitor::Monitor;
pub use pipeline::{PipelineConfig, decode_loop};
pub use session::MonitorSession;

// 协议层类型，方便调用方只依赖本 crate
pub use biomon_protocol::{DecodedSample, PacketDecoder};
