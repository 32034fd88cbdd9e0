//! Simulation speed multipliers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Tick cadence multiplier. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SimulationSpeed {
    /// 1000 ms per tick.
    #[default]
    #[serde(rename = "1x")]
    X1,
    /// 500 ms per tick.
    #[serde(rename = "2x")]
    X2,
    /// 250 ms per tick.
    #[serde(rename = "4x")]
    X4,
    /// 125 ms per tick.
    #[serde(rename = "8x")]
    X8,
}

impl SimulationSpeed {
    pub const ALL: [SimulationSpeed; 4] = [
        SimulationSpeed::X1,
        SimulationSpeed::X2,
        SimulationSpeed::X4,
        SimulationSpeed::X8,
    ];

    /// Tick interval in milliseconds.
    pub fn interval_ms(self) -> u64 {
        match self {
            SimulationSpeed::X1 => 1000,
            SimulationSpeed::X2 => 500,
            SimulationSpeed::X4 => 250,
            SimulationSpeed::X8 => 125,
        }
    }

    pub fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms())
    }

    pub fn label(self) -> &'static str {
        match self {
            SimulationSpeed::X1 => "1x",
            SimulationSpeed::X2 => "2x",
            SimulationSpeed::X4 => "4x",
            SimulationSpeed::X8 => "8x",
        }
    }
}

impl fmt::Display for SimulationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SimulationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SimulationSpeed::ALL
            .into_iter()
            .find(|speed| {
                speed.label() == normalized || speed.interval_ms().to_string() == normalized
            })
            .ok_or_else(|| format!("unknown speed '{s}' (expected 1x, 2x, 4x or 8x)"))
    }
}
