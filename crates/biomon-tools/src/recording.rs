//! # 录制格式定义
//!
//! 原始数据包录制文件，所有工具共用。
//! 被拒绝的数据包同样录制，回放时能够重现传输噪声。

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 录制文件魔数
const MAGIC: &[u8; 8] = b"BIOMONRC";

/// 当前格式版本
const FORMAT_VERSION: u8 = 1;

/// 录制文件错误
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Recording IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recording serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Invalid recording file (magic mismatch)")]
    InvalidMagic,

    #[error("Unsupported recording version: {0}")]
    UnsupportedVersion(u8),
}

/// 录制的单个数据包
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedPacket {
    /// 相对录制开始的偏移（毫秒）
    pub offset_ms: u64,
    /// 原始数据包文本
    pub raw: String,
}

/// 录制元数据
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// 数据来源（设备路径、"stdin" 等）
    pub source: String,
    /// 创建时间（Unix 秒）
    pub created_at_unix: u64,
    /// 备注
    pub note: Option<String>,
}

/// 数据包录制 v1
///
/// 格式：
///
/// ```text
/// [MAGIC: 8 bytes "BIOMONRC"]
/// [Version: 1 byte]
/// [Data: bincode serialized PacketRecording]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketRecording {
    /// 格式版本
    pub version: u8,
    /// 元数据
    pub metadata: RecordingMetadata,
    /// 按到达顺序排列的数据包
    pub packets: Vec<RecordedPacket>,
}

impl PacketRecording {
    /// 创建新的录制
    pub fn new(metadata: RecordingMetadata) -> Self {
        Self {
            version: FORMAT_VERSION,
            metadata,
            packets: Vec::new(),
        }
    }

    /// 添加数据包
    ///
    /// 偏移小于上一个数据包时被抬高到上一个偏移，保证回放顺序单调。
    pub fn add_packet(&mut self, offset: Duration, raw: impl Into<String>) {
        let offset_ms = u64::try_from(offset.as_millis()).unwrap_or(u64::MAX);
        let floor = self.packets.last().map_or(0, |p| p.offset_ms);
        self.packets.push(RecordedPacket {
            offset_ms: offset_ms.max(floor),
            raw: raw.into(),
        });
    }

    /// 数据包数量
    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    /// 录制时长（首末数据包之间）
    pub fn duration(&self) -> Option<Duration> {
        let first = self.packets.first()?.offset_ms;
        let last = self.packets.last()?.offset_ms;
        Some(Duration::from_millis(last.saturating_sub(first)))
    }

    /// 保存到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RecordingError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&[self.version])?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RecordingError> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(RecordingError::InvalidMagic);
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != FORMAT_VERSION {
            return Err(RecordingError::UnsupportedVersion(version[0]));
        }

        Ok(bincode::deserialize_from(&mut reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_recording() -> PacketRecording {
        let mut recording = PacketRecording::new(RecordingMetadata {
            source: "/dev/rfcomm0".to_string(),
            created_at_unix: 1_700_000_000,
            note: Some("aeração noturna".to_string()),
        });
        recording.add_packet(Duration::from_millis(0), "D;27.5;1;0;1;0;CICLO_AERACAO;T");
        recording.add_packet(Duration::from_millis(1500), "X;1;2;3;T");
        recording.add_packet(Duration::from_millis(3000), "D;28.0;0;1;0;1;CICLO_BOMBEAMENTO;T");
        recording
    }

    #[test]
    fn test_save_and_load() {
        let recording = sample_recording();
        let file = NamedTempFile::new().unwrap();

        recording.save(file.path()).unwrap();
        let loaded = PacketRecording::load(file.path()).unwrap();

        assert_eq!(loaded, recording);
        assert_eq!(loaded.packet_count(), 3);
        assert_eq!(loaded.duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"NOTAREC!\x01rest").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            PacketRecording::load(file.path()),
            Err(RecordingError::InvalidMagic)
        ));
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MAGIC).unwrap();
        file.write_all(&[9]).unwrap();
        file.flush().unwrap();

        assert!(matches!(
            PacketRecording::load(file.path()),
            Err(RecordingError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_load_truncated_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"BIO").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            PacketRecording::load(file.path()),
            Err(RecordingError::Io(_))
        ));
    }

    #[test]
    fn test_offsets_monotonic() {
        let mut recording = PacketRecording::new(RecordingMetadata::default());
        recording.add_packet(Duration::from_millis(500), "a");
        recording.add_packet(Duration::from_millis(200), "b");
        assert_eq!(recording.packets[1].offset_ms, 500);
        assert_eq!(recording.duration(), Some(Duration::ZERO));
    }

    #[test]
    fn test_duration_with_decreasing_loaded_offsets() {
        let mut recording = PacketRecording::new(RecordingMetadata::default());
        recording.packets = vec![
            RecordedPacket {
                offset_ms: 900,
                raw: "a".to_string(),
            },
            RecordedPacket {
                offset_ms: 100,
                raw: "b".to_string(),
            },
        ];

        let file = NamedTempFile::new().unwrap();
        recording.save(file.path()).unwrap();
        let loaded = PacketRecording::load(file.path()).unwrap();

        assert_eq!(loaded.duration(), Some(Duration::ZERO));
    }

    #[test]
    fn test_empty_recording_duration() {
        let recording = PacketRecording::new(RecordingMetadata::default());
        assert_eq!(recording.duration(), None);
    }
}
