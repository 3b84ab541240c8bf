//! 驱动层错误类型定义

use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 通道已关闭（解码线程已退出）
    #[error("Channel closed")]
    ChannelClosed,

    /// 等待样本超时
    #[error("Operation timeout")]
    Timeout,

    /// 解码线程错误
    #[error("Decode thread error: {0}")]
    IoThread(String),
}
