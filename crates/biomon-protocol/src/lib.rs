//! # Biomon Protocol
//!
//! 反应器控制器文本遥测包协议定义（无 IO、无时钟依赖）
//!
//! ## 模块
//!
//! - `constants`: 帧标记、分隔符、开关量词汇等协议常量
//! - `actuator`: 执行器（搅拌器、曝气器、泵）状态与显示标签
//! - `packet`: 数据包解码与 `DecodedSample` 构建
//!
//! ## 线格式
//!
//! ```text
//! D;<temp:float>;<agitator:0|1>;<aerator:0|1>;<pump1:0|1>;<pump2:0|1>;<cycleLabel>;T
//! ```
//!
//! 解码是纯函数：给定 `(raw, elapsed_seconds)` 总是得到相同结果，
//! 经过的时间由调用方（会话层）提供。

pub mod actuator;
pub mod constants;
pub mod packet;

// 重新导出常用类型
pub use actuator::*;
pub use constants::*;
pub use packet::*;

use thiserror::Error;

/// 数据包解码错误类型
///
/// 所有错误都只在解码器内部使用，对外的 [`PacketDecoder::decode`]
/// 只返回 `Option`。[`PacketDecoder::try_decode`] 暴露具体原因，
/// 供计数和命令行诊断使用。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// 缺少 `D;` 前缀或 `;T` 后缀（常见噪声，静默丢弃）
    #[error("Framing mismatch: packet must start with \"D;\" and end with \";T\"")]
    FramingMismatch,

    /// 分割后的字段数量不等于 6（静默丢弃）
    #[error("Field count mismatch: expected {expected}, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    /// 温度字段无法转换为有限浮点数（记录日志）
    #[error("Invalid temperature field: {value:?}")]
    InvalidTemperature { value: String },
}

impl DecodeError {
    /// 是否需要上报到日志
    ///
    /// 只有数值转换失败会被记录，帧标记和字段数错误属于预期噪声。
    pub fn is_reportable(&self) -> bool {
        matches!(self, DecodeError::InvalidTemperature { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let msg = format!("{}", DecodeError::FramingMismatch);
        assert!(msg.contains("\"D;\"") && msg.contains("\";T\""), "{}", msg);

        let msg = format!(
            "{}",
            DecodeError::FieldCountMismatch {
                expected: 6,
                actual: 5
            }
        );
        assert_eq!(msg, "Field count mismatch: expected 6, got 5");

        let msg = format!(
            "{}",
            DecodeError::InvalidTemperature {
                value: "XX".to_string()
            }
        );
        assert_eq!(msg, "Invalid temperature field: \"XX\"");
    }

    #[test]
    fn test_only_conversion_failures_are_reportable() {
        assert!(!DecodeError::FramingMismatch.is_reportable());
        assert!(
            !DecodeError::FieldCountMismatch {
                expected: 6,
                actual: 7
            }
            .is_reportable()
        );
        assert!(
            DecodeError::InvalidTemperature {
                value: "abc".to_string()
            }
            .is_reportable()
        );
    }
}
