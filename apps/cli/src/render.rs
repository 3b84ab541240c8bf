//! 终端显示
//!
//! 一个样本渲染为一行：
//!
//! ```text
//! [t=12s] 27.5 °C | Agitador: LIGADO | Aeração: DESLIGADO | Bomba 1: LIGADO | Bomba 2: DESLIGADO | CICLO_AERACAO
//! ```

use biomon_driver::MetricsSnapshot;
use biomon_protocol::{ActuatorState, DecodedSample};
use biomon_tools::{SERIES_DESCRIPTION, TemperatureSeries};
use std::fmt::Write;
use std::io::IsTerminal;

/// 执行器开启颜色（绿色 #4CAF50）
const COLOR_ON: &str = "\x1b[38;2;76;175;80m";
/// 执行器关闭颜色（红色 #F44336）
const COLOR_OFF: &str = "\x1b[38;2;244;67;54m";
const COLOR_RESET: &str = "\x1b[0m";

/// 是否启用着色：配置允许、未传 `--no-color` 且 stdout 是终端
pub fn color_enabled(config_color: bool, no_color: bool) -> bool {
    config_color && !no_color && std::io::stdout().is_terminal()
}

/// 渲染单个执行器标签
fn actuator_label(state: &ActuatorState, color: bool) -> String {
    let label = state.label();
    if !color {
        return label;
    }
    let code = if state.is_on { COLOR_ON } else { COLOR_OFF };
    format!("{code}{label}{COLOR_RESET}")
}

/// 渲染一行仪表盘
pub fn dashboard_line(sample: &DecodedSample, color: bool) -> String {
    let mut line = format!(
        "[t={}s] {}",
        sample.elapsed_seconds,
        sample.temperature_display()
    );
    for state in sample.actuator_states() {
        let _ = write!(line, " | {}", actuator_label(&state, color));
    }
    let _ = write!(line, " | {}", sample.cycle_label);
    line
}

/// 会话结束时的摘要
pub fn summary(series: &TemperatureSeries, metrics: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 会话摘要");
    let _ = writeln!(out, "  {SERIES_DESCRIPTION}: {} 个点", series.len());
    if let (Some(min), Some(max), Some(mean)) = (series.min(), series.max(), series.mean()) {
        let _ = writeln!(out, "  温度: 最低 {min:.1} °C, 最高 {max:.1} °C, 平均 {mean:.1} °C");
    }
    if let Some(duration) = series.duration_seconds() {
        let _ = writeln!(out, "  时长: {duration} s");
    }
    let _ = writeln!(
        out,
        "  数据包: {} 个, 解码 {} 个 ({:.1}%)",
        metrics.packets_total,
        metrics.samples_decoded,
        metrics.acceptance_rate()
    );
    let _ = writeln!(
        out,
        "  拒绝: 帧格式 {}, 字段数 {}, 转换失败 {}",
        metrics.framing_rejected, metrics.field_count_rejected, metrics.conversion_failures
    );
    if metrics.samples_undelivered > 0 {
        let _ = writeln!(out, "  ⚠️ 未送达样本: {}", metrics.samples_undelivered);
    }
    out
}
