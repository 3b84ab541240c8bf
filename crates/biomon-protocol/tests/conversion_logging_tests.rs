//! 日志上报测试
//!
//! 数值转换失败必须通过 tracing 上报（包含原始包），
//! 帧标记和字段数错误保持静默。

use biomon_protocol::decode;
use std::io;
use std::sync::{Arc, Mutex};

/// 将日志写入共享缓冲区
#[derive(Clone, Default)]
struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 在捕获日志的订阅者下运行闭包，返回日志文本
fn capture_logs(f: impl FnOnce()) -> String {
    let writer = CaptureWriter::default();
    let make_writer = writer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || make_writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    writer.contents()
}

#[test]
fn test_conversion_failure_is_logged_with_packet() {
    let logs = capture_logs(|| {
        assert!(decode("D;XX;1;0;1;0;C;T", 0).is_none());
    });

    assert!(logs.contains("ERROR"), "logs: {}", logs);
    assert!(logs.contains("D;XX;1;0;1;0;C;T"), "logs: {}", logs);
}

#[test]
fn test_framing_and_count_mismatches_are_silent() {
    let logs = capture_logs(|| {
        assert!(decode("X;1;2;3;T", 0).is_none());
        assert!(decode("D;1;2;3;4;5;T", 0).is_none());
    });

    assert!(logs.is_empty(), "unexpected logs: {}", logs);
}

#[test]
fn test_successful_decode_is_silent() {
    let logs = capture_logs(|| {
        assert!(decode("D;27.5;1;0;1;0;CICLO_AERACAO;T", 12).is_some());
    });

    assert!(logs.is_empty(), "unexpected logs: {}", logs);
}
