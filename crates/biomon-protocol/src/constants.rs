//! 协议常量定义
//!
//! 控制器固件与监视端共享的线格式常量。

/// 数据包起始标记
pub const PACKET_PREFIX: &str = "D;";

/// 数据包结束标记
pub const PACKET_SUFFIX: &str = ";T";

/// 字段分隔符
pub const FIELD_SEPARATOR: char = ';';

/// 包体字段数量（温度 + 4 个执行器 + 周期标签）
pub const FIELD_COUNT: usize = 6;

/// 执行器数量
pub const ACTUATOR_COUNT: usize = 4;

/// 执行器开启的唯一合法取值，其余任何字符串都视为关闭
pub const ACTUATOR_ON_FLAG: &str = "1";

/// 执行器关闭时编码使用的取值
pub const ACTUATOR_OFF_FLAG: &str = "0";

/// 开启状态显示词
pub const LABEL_ON: &str = "LIGADO";

/// 关闭状态显示词
pub const LABEL_OFF: &str = "DESLIGADO";

// 字段下标
pub(crate) const TEMPERATURE_FIELD: usize = 0;
pub(crate) const FIRST_ACTUATOR_FIELD: usize = 1;
pub(crate) const CYCLE_LABEL_FIELD: usize = 5;
