//! # 温度时间序列
//!
//! 图表数据：横轴为经过秒数，纵轴为温度（°C）。
//! 每个成功解码的样本追加一个点，顺序与到达顺序一致。

use biomon_protocol::DecodedSample;
use std::collections::VecDeque;
use std::fmt::Write;

/// 图表描述
pub const SERIES_DESCRIPTION: &str = "Temperatura (°C) vs Tempo (s)";

/// 序列中的一个点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub elapsed_seconds: i64,
    pub temperature_celsius: f64,
}

/// 温度时间序列
///
/// 可选容量上限，超过后丢弃最旧的点。
///
/// # Example
///
/// ```
/// use biomon_protocol::decode;
/// use biomon_tools::TemperatureSeries;
///
/// let mut series = TemperatureSeries::new();
/// series.push_sample(&decode("D;27.5;1;0;1;0;CICLO;T", 12).unwrap());
/// assert_eq!(series.latest().unwrap().temperature_celsius, 27.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemperatureSeries {
    points: VecDeque<SeriesPoint>,
    capacity: Option<usize>,
}

impl TemperatureSeries {
    /// 创建无容量上限的序列
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建有容量上限的序列（容量为 0 时视为 1）
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// 追加一个样本
    pub fn push_sample(&mut self, sample: &DecodedSample) {
        self.push(sample.elapsed_seconds, sample.temperature_celsius);
    }

    /// 追加一个点
    pub fn push(&mut self, elapsed_seconds: i64, temperature_celsius: f64) {
        if let Some(capacity) = self.capacity
            && self.points.len() >= capacity
        {
            self.points.pop_front();
        }
        self.points.push_back(SeriesPoint {
            elapsed_seconds,
            temperature_celsius,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 按到达顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    /// 最新的点
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    /// 最低温度
    pub fn min(&self) -> Option<f64> {
        self.temperatures().reduce(f64::min)
    }

    /// 最高温度
    pub fn max(&self) -> Option<f64> {
        self.temperatures().reduce(f64::max)
    }

    /// 平均温度
    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.temperatures().sum::<f64>() / self.points.len() as f64)
    }

    /// 首末两点之间的秒数
    pub fn duration_seconds(&self) -> Option<i64> {
        let first = self.points.front()?;
        let last = self.points.back()?;
        Some(last.elapsed_seconds - first.elapsed_seconds)
    }

    /// 导出为 CSV（表头 `elapsed_s,temperature_c`）
    pub fn to_csv(&self) -> String {
        let mut out = String::from("elapsed_s,temperature_c\n");
        for point in &self.points {
            // 写入 String 不会失败
            let _ = writeln!(out, "{},{}", point.elapsed_seconds, point.temperature_celsius);
        }
        out
    }

    fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.temperature_celsius)
    }
}
