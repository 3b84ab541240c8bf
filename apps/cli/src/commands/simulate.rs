//! simulate 命令
//!
//! 输出模拟的反应器数据包（可混入损坏的数据包），可直接管道给 `monitor`。

use anyhow::Result;
use biomon_protocol::{ActuatorStates, DecodedSample};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// 循环阶段标签
const CYCLE_LABELS: [&str; 4] = [
    "CICLO_AERACAO",
    "CICLO_AGITACAO",
    "CICLO_BOMBEAMENTO",
    "CICLO_REPOUSO",
];

/// 每个阶段持续的数据包数
const PACKETS_PER_CYCLE: u64 = 10;

/// 损坏数据包样例（帧格式、字段数、温度字段各一类）
const MALFORMED_PACKETS: [&str; 5] = [
    "X;27.5;1;0;1;0;CICLO;T",
    "D;27.5;1;0;1;0;CICLO",
    "D;27.5;1;0;1;CICLO;T",
    "D;abc;1;0;1;0;CICLO;T",
    "D;27.5;1;0;1;0;;T",
];

/// 模拟命令参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 输出的有效数据包数量
    #[arg(short = 'n', long, default_value_t = 60)]
    pub count: u64,

    /// 数据包间隔（毫秒）
    #[arg(long, default_value_t = 0)]
    pub interval_ms: u64,

    /// 每个数据包之后混入损坏数据包的概率（0.0 ~ 1.0）
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// 随机种子（便于复现）
    #[arg(long)]
    pub seed: Option<u64>,

    /// 初始温度（°C）
    #[arg(long, default_value_t = 27.0)]
    pub start_temp: f64,
}

impl SimulateCommand {
    pub fn execute(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.noise) {
            anyhow::bail!("❌ 噪声概率必须在 0.0 ~ 1.0 之间，当前: {}", self.noise);
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut simulator = ReactorSimulator::new(self.start_temp);

        for i in 0..self.count {
            let packet = simulator.next_packet(&mut rng, i);
            if writeln!(out, "{packet}").is_err() {
                // 下游管道已关闭
                return Ok(());
            }

            if rng.gen_bool(self.noise) {
                let bad = MALFORMED_PACKETS[rng.gen_range(0..MALFORMED_PACKETS.len())];
                if writeln!(out, "{bad}").is_err() {
                    return Ok(());
                }
            }

            out.flush()?;
            if self.interval_ms > 0 {
                thread::sleep(Duration::from_millis(self.interval_ms));
            }
        }

        Ok(())
    }
}

/// 反应器模拟器：温度随机游走，执行器随阶段切换
#[derive(Debug, Clone)]
struct ReactorSimulator {
    temperature: f64,
}

impl ReactorSimulator {
    fn new(start_temp: f64) -> Self {
        Self {
            temperature: start_temp,
        }
    }

    fn next_packet<R: Rng>(&mut self, rng: &mut R, index: u64) -> String {
        self.temperature = (self.temperature + rng.gen_range(-0.3..=0.3)).clamp(15.0, 45.0);
        let temperature = (self.temperature * 10.0).round() / 10.0;

        let phase = ((index / PACKETS_PER_CYCLE) % CYCLE_LABELS.len() as u64) as usize;
        let actuators = match phase {
            0 => [false, true, false, false],
            1 => [true, false, false, false],
            2 => [false, false, true, true],
            _ => [false, false, false, false],
        };

        DecodedSample {
            temperature_celsius: temperature,
            elapsed_seconds: 0,
            actuators: ActuatorStates::from(actuators),
            cycle_label: CYCLE_LABELS[phase].to_string(),
        }
        .to_packet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biomon_protocol::decode;

    #[test]
    fn test_simulated_packets_decode() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut simulator = ReactorSimulator::new(27.0);

        for i in 0..(PACKETS_PER_CYCLE * 4) {
            let packet = simulator.next_packet(&mut rng, i);
            let sample = decode(&packet, 0).expect("simulated packet must decode");
            assert!((15.0..=45.0).contains(&sample.temperature_celsius));
        }
    }

    #[test]
    fn test_phase_sets_label_and_actuators() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut simulator = ReactorSimulator::new(27.0);

        let pumping = decode(&simulator.next_packet(&mut rng, 2 * PACKETS_PER_CYCLE), 0).unwrap();
        assert_eq!(pumping.cycle_label, "CICLO_BOMBEAMENTO");
        assert_eq!(pumping.actuators.count_on(), 2);
    }

    #[test]
    fn test_malformed_packets_rejected() {
        for packet in MALFORMED_PACKETS {
            assert!(decode(packet, 0).is_none(), "{packet}");
        }
    }
}
