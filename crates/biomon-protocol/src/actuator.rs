//! 执行器状态定义
//!
//! 每个数据包携带 4 个开关量执行器的状态，顺序固定为
//! 搅拌器、曝气器、泵 1、泵 2。

use crate::constants::{ACTUATOR_COUNT, ACTUATOR_OFF_FLAG, ACTUATOR_ON_FLAG, LABEL_OFF, LABEL_ON};
use std::fmt;

/// 执行器（按线格式中的字段顺序排列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Actuator {
    /// 搅拌器（字段 1）
    Agitator = 0,
    /// 曝气器（字段 2）
    Aerator = 1,
    /// 泵 1（字段 3）
    Pump1 = 2,
    /// 泵 2（字段 4）
    Pump2 = 3,
}

impl Actuator {
    /// 所有执行器，按线格式顺序
    pub const ALL: [Actuator; ACTUATOR_COUNT] = [
        Actuator::Agitator,
        Actuator::Aerator,
        Actuator::Pump1,
        Actuator::Pump2,
    ];

    /// 在 [`ActuatorStates`] 中的下标
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 控制面板上使用的显示名称
    pub const fn display_name(self) -> &'static str {
        match self {
            Actuator::Agitator => "Agitador",
            Actuator::Aerator => "Aeração",
            Actuator::Pump1 => "Bomba 1",
            Actuator::Pump2 => "Bomba 2",
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 解析单个执行器字段
///
/// 只有字面量 `"1"` 表示开启，其余任何内容（`"0"`、空串、乱码）都视为关闭。
pub fn parse_actuator_flag(field: &str) -> bool {
    field == ACTUATOR_ON_FLAG
}

/// 生成执行器显示标签
///
/// # Example
///
/// ```
/// use biomon_protocol::format_actuator_label;
///
/// assert_eq!(format_actuator_label("Agitador", true), "Agitador: LIGADO");
/// assert_eq!(format_actuator_label("Agitador", false), "Agitador: DESLIGADO");
/// ```
pub fn format_actuator_label(name: &str, is_on: bool) -> String {
    let word = if is_on { LABEL_ON } else { LABEL_OFF };
    format!("{}: {}", name, word)
}

/// 一个数据包中 4 个执行器的开关状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActuatorStates(pub [bool; ACTUATOR_COUNT]);

impl ActuatorStates {
    /// 从线格式字段构建（字段顺序同 [`Actuator::ALL`]）
    pub fn from_fields(fields: [&str; ACTUATOR_COUNT]) -> Self {
        Self(fields.map(parse_actuator_flag))
    }

    /// 查询单个执行器是否开启
    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.0[actuator.index()]
    }

    /// 原始布尔数组
    pub fn as_array(&self) -> &[bool; ACTUATOR_COUNT] {
        &self.0
    }

    /// 开启中的执行器数量
    pub fn count_on(&self) -> usize {
        self.0.iter().filter(|on| **on).count()
    }

    /// 按线格式顺序遍历显示投影
    pub fn iter(&self) -> impl Iterator<Item = ActuatorState> + '_ {
        Actuator::ALL.iter().map(|&actuator| ActuatorState {
            actuator,
            is_on: self.is_on(actuator),
        })
    }

    /// 编码为线格式字段（`"1"` / `"0"`）
    pub(crate) fn wire_flags(&self) -> [&'static str; ACTUATOR_COUNT] {
        self.0.map(|on| if on { ACTUATOR_ON_FLAG } else { ACTUATOR_OFF_FLAG })
    }
}

impl From<[bool; ACTUATOR_COUNT]> for ActuatorStates {
    fn from(states: [bool; ACTUATOR_COUNT]) -> Self {
        Self(states)
    }
}

/// 执行器显示投影：(名称, 是否开启)
///
/// 由 [`ActuatorStates::iter`] 即时生成，不单独存储。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    pub actuator: Actuator,
    pub is_on: bool,
}

impl ActuatorState {
    /// 显示名称
    pub fn name(&self) -> &'static str {
        self.actuator.display_name()
    }

    /// 显示标签，如 `"Bomba 1: LIGADO"`
    pub fn label(&self) -> String {
        format_actuator_label(self.name(), self.is_on)
    }
}
