//! 命令定义和实现

pub mod config;
pub mod decode;
pub mod monitor;
pub mod replay;
pub mod simulate;

pub use config::ConfigCommand;
pub use decode::DecodeCommand;
pub use monitor::MonitorCommand;
pub use replay::ReplayCommand;
pub use simulate::SimulateCommand;
