//! CLI 配置文件
//!
//! 默认位置：`<config_dir>/biomon/config.toml`，不存在时使用默认值。

use anyhow::{Context, Result};
use biomon_driver::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置目录
fn config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("biomon");
    Ok(path)
}

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = config_dir()?;
    path.push("config.toml");
    Ok(path)
}

/// 会话参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// 解码线程接收超时（毫秒）
    pub receive_timeout_ms: u64,
    /// 样本通道容量
    pub sample_channel_capacity: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            receive_timeout_ms: pipeline.receive_timeout_ms,
            sample_channel_capacity: pipeline.sample_channel_capacity,
        }
    }
}

/// 显示参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// 是否对执行器状态着色
    pub color: bool,
    /// 图表保留的点数上限（0 表示不限）
    pub series_capacity: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            color: true,
            series_capacity: 0,
        }
    }
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub session: SessionSection,
    pub display: DisplaySection,
}

impl CliConfig {
    /// 加载配置（文件不存在时返回默认配置）
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        let body = toml::to_string_pretty(self).context("序列化配置失败")?;
        let content = format!("# Biomon CLI Configuration\n\n{body}");
        fs::write(path, content).context("写入配置文件失败")?;

        Ok(())
    }

    /// 转换为解码管道配置
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            receive_timeout_ms: self.session.receive_timeout_ms.max(1),
            sample_channel_capacity: self.session.sample_channel_capacity.max(1),
        }
    }

    /// 读取配置项（`section.key` 形式）
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "session.receive_timeout_ms" => self.session.receive_timeout_ms.to_string(),
            "session.sample_channel_capacity" => self.session.sample_channel_capacity.to_string(),
            "display.color" => self.display.color.to_string(),
            "display.series_capacity" => self.display.series_capacity.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// 设置配置项（`section.key` 形式）
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "session.receive_timeout_ms" => {
                self.session.receive_timeout_ms = value.parse().context("需要正整数")?;
            },
            "session.sample_channel_capacity" => {
                self.session.sample_channel_capacity = value.parse().context("需要正整数")?;
            },
            "display.color" => {
                self.display.color = value.parse().context("需要 true 或 false")?;
            },
            "display.series_capacity" => {
                self.display.series_capacity = value.parse().context("需要非负整数")?;
            },
            _ => anyhow::bail!("未知配置项: {key}"),
        }
        Ok(())
    }

    /// 检查配置，返回发现的问题
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.session.receive_timeout_ms == 0 {
            issues.push("session.receive_timeout_ms 为 0，将按 1 毫秒处理".to_string());
        }
        if self.session.sample_channel_capacity == 0 {
            issues.push("session.sample_channel_capacity 为 0，将按 1 处理".to_string());
        }
        issues
    }
}

/// 所有配置项名称
pub const CONFIG_KEYS: [&str; 4] = [
    "session.receive_timeout_ms",
    "session.sample_channel_capacity",
    "display.color",
    "display.series_capacity",
];
