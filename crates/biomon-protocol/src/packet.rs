//! 数据包解码
//!
//! 将一个原始文本包转换为零个或一个 [`DecodedSample`]。
//! 解码是全有或全无的：任何一步失败都不会产生部分样本。

use crate::actuator::{ActuatorState, ActuatorStates};
use crate::constants::*;
use crate::DecodeError;
use tracing::error;

/// 解码后的样本
///
/// 每次成功解码新建一个，返回后归调用方所有。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedSample {
    /// 温度（摄氏度）
    pub temperature_celsius: f64,
    /// 会话开始以来经过的整秒数（由调用方提供）
    pub elapsed_seconds: i64,
    /// 执行器状态：搅拌器、曝气器、泵 1、泵 2
    pub actuators: ActuatorStates,
    /// 当前运行周期标签（原样透传）
    pub cycle_label: String,
}

impl DecodedSample {
    /// 温度读数显示文本（保留一位小数），如 `"27.5 °C"`
    pub fn temperature_display(&self) -> String {
        format!("{:.1} °C", self.temperature_celsius)
    }

    /// 执行器显示投影
    pub fn actuator_states(&self) -> impl Iterator<Item = ActuatorState> + '_ {
        self.actuators.iter()
    }

    /// 编码回线格式
    ///
    /// 经过时间不在线格式中。周期标签不能包含 `;`，且不能为空，
    /// 否则编码结果无法被重新解码。
    pub fn to_packet(&self) -> String {
        let flags = self.actuators.wire_flags();
        format!(
            "{prefix}{temp}{sep}{a}{sep}{b}{sep}{c}{sep}{d}{sep}{label}{suffix}",
            prefix = PACKET_PREFIX,
            temp = self.temperature_celsius,
            a = flags[0],
            b = flags[1],
            c = flags[2],
            d = flags[3],
            label = self.cycle_label,
            sep = FIELD_SEPARATOR,
            suffix = PACKET_SUFFIX,
        )
    }
}

/// 数据包解码器
///
/// 无状态，可在任意线程上反复调用。经过时间作为参数传入，
/// 因此解码结果与墙上时钟无关。
///
/// # Example
///
/// ```
/// use biomon_protocol::PacketDecoder;
///
/// let decoder = PacketDecoder::new();
/// let sample = decoder.decode("D;27.5;1;0;1;0;CICLO_AERACAO;T", 12).unwrap();
/// assert_eq!(sample.temperature_celsius, 27.5);
/// assert_eq!(sample.elapsed_seconds, 12);
/// assert_eq!(sample.actuators.as_array(), &[true, false, true, false]);
/// assert_eq!(sample.cycle_label, "CICLO_AERACAO");
///
/// assert!(decoder.decode("X;1;2;3;T", 0).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketDecoder;

impl PacketDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 解码一个数据包
    ///
    /// 格式错误的输入返回 `None`，永不 panic。
    /// 温度转换失败会记录一条 `error` 级日志（包含原始包），
    /// 帧标记和字段数不匹配则静默丢弃。
    pub fn decode(&self, raw: &str, elapsed_seconds: i64) -> Option<DecodedSample> {
        self.decode_checked(raw, elapsed_seconds).ok()
    }

    /// 解码一个数据包，按 [`decode`](Self::decode) 的规则上报日志，
    /// 同时返回拒绝原因（供统计计数使用）
    pub fn decode_checked(&self, raw: &str, elapsed_seconds: i64) -> Result<DecodedSample, DecodeError> {
        let result = self.try_decode(raw, elapsed_seconds);
        if let Err(e) = &result
            && e.is_reportable()
        {
            error!(packet = %raw, error = %e, "Failed to convert packet fields");
        }
        result
    }

    /// 解码一个数据包并返回具体的拒绝原因
    ///
    /// 不记录任何日志，由调用方决定如何处理错误。
    pub fn try_decode(&self, raw: &str, elapsed_seconds: i64) -> Result<DecodedSample, DecodeError> {
        let body = strip_framing(raw).ok_or(DecodeError::FramingMismatch)?;
        let fields = split_fields(body);

        if fields.len() != FIELD_COUNT {
            return Err(DecodeError::FieldCountMismatch {
                expected: FIELD_COUNT,
                actual: fields.len(),
            });
        }

        let temperature_celsius = parse_temperature(fields[TEMPERATURE_FIELD])?;

        let actuators = ActuatorStates::from_fields([
            fields[FIRST_ACTUATOR_FIELD],
            fields[FIRST_ACTUATOR_FIELD + 1],
            fields[FIRST_ACTUATOR_FIELD + 2],
            fields[FIRST_ACTUATOR_FIELD + 3],
        ]);

        Ok(DecodedSample {
            temperature_celsius,
            elapsed_seconds,
            actuators,
            cycle_label: fields[CYCLE_LABEL_FIELD].to_string(),
        })
    }
}

/// 使用默认解码器解码
pub fn decode(raw: &str, elapsed_seconds: i64) -> Option<DecodedSample> {
    PacketDecoder::new().decode(raw, elapsed_seconds)
}

/// 去掉起止标记，返回包体
///
/// 前缀和后缀不能重叠：`"D;T"` 没有包体，视为帧错误。
fn strip_framing(raw: &str) -> Option<&str> {
    raw.strip_prefix(PACKET_PREFIX)?.strip_suffix(PACKET_SUFFIX)
}

/// 按 `;` 分割包体，并丢弃末尾的空字段
///
/// 与控制器固件配套的监视端一直以这种方式计数，
/// 因此标签为空的包（`...;0;;T`）会被当作字段数不足。
fn split_fields(body: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = body.split(FIELD_SEPARATOR).collect();
    while fields.len() > 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// 解析温度字段（十进制浮点数，允许首尾空白，拒绝 NaN/无穷大）
fn parse_temperature(field: &str) -> Result<f64, DecodeError> {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DecodeError::InvalidTemperature {
            value: field.to_string(),
        }),
    }
}
