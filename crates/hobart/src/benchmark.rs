//! Market benchmark registry.
//!
//! The detector always compares a security against a fixed benchmark
//! index. This module holds the closed set of supported benchmarks and
//! their Yahoo Finance symbols.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported market benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    /// S&P 500 index.
    Sp500,
    /// Nasdaq-100 index.
    Nasdaq100,
    /// Dow Jones Industrial Average.
    DowJones,
    /// Russell 2000 index.
    Russell2000,
}

impl Benchmark {
    /// Yahoo Finance symbol for the index.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Sp500 => "^GSPC",
            Self::Nasdaq100 => "^NDX",
            Self::DowJones => "^DJI",
            Self::Russell2000 => "^RUT",
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sp500 => "S&P 500",
            Self::Nasdaq100 => "Nasdaq-100",
            Self::DowJones => "Dow Jones Industrial Average",
            Self::Russell2000 => "Russell 2000",
        }
    }

    /// All supported benchmarks.
    pub const fn all() -> [Self; 4] {
        [Self::Sp500, Self::Nasdaq100, Self::DowJones, Self::Russell2000]
    }
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::Sp500
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Benchmark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sp500" | "spx" | "^gspc" => Ok(Self::Sp500),
            "nasdaq100" | "ndx" | "^ndx" => Ok(Self::Nasdaq100),
            "dow" | "dowjones" | "dji" | "^dji" => Ok(Self::DowJones),
            "russell2000" | "rut" | "^rut" => Ok(Self::Russell2000),
            other => Err(format!(
                "Unknown benchmark '{other}' (expected one of: sp500, nasdaq100, dow, russell2000)"
            )),
        }
    }
}
