// Display units for compute and memory quantities
use serde::{Deserialize, Serialize};

/// A canonical quantity scaled into a display unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayQuantity {
    pub value: f64,
    pub text: String,
}

/// Maps a canonical stored quantity onto a display representation.
pub trait DisplayUnit: Copy {
    fn symbol(self) -> &'static str;

    /// Numeric value in this unit. Non-finite input is treated as 0.
    fn scale(self, canonical: f64) -> f64;

    fn format(self, canonical: f64) -> String;

    fn display(self, canonical: f64) -> DisplayQuantity {
        DisplayQuantity {
            value: self.scale(canonical),
            text: self.format(canonical),
        }
    }
}

/// Non-finite values and negative zero become `0.0`.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value != 0.0 { value } else { 0.0 }
}

pub fn to_millicores(cores: f64) -> f64 {
    finite_or_zero((finite_or_zero(cores) * 1000.0).round())
}

pub fn to_mib(gib: f64) -> f64 {
    finite_or_zero((finite_or_zero(gib) * 1024.0).round())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuUnit {
    #[default]
    #[serde(rename = "cores")]
    Cores,
    #[serde(rename = "millicores")]
    Millicores,
}

impl DisplayUnit for CpuUnit {
    fn symbol(self) -> &'static str {
        match self {
            CpuUnit::Cores => "cores",
            CpuUnit::Millicores => "m",
        }
    }

    fn scale(self, cores: f64) -> f64 {
        match self {
            CpuUnit::Cores => finite_or_zero(cores),
            CpuUnit::Millicores => to_millicores(cores),
        }
    }

    fn format(self, cores: f64) -> String {
        match self {
            CpuUnit::Cores => format!("{:.2} cores", finite_or_zero(cores)),
            CpuUnit::Millicores => format!("{} m", to_millicores(cores)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryUnit {
    #[default]
    #[serde(rename = "GiB")]
    GiB,
    #[serde(rename = "MiB")]
    MiB,
}

impl DisplayUnit for MemoryUnit {
    fn symbol(self) -> &'static str {
        match self {
            MemoryUnit::GiB => "GiB",
            MemoryUnit::MiB => "MiB",
        }
    }

    fn scale(self, gib: f64) -> f64 {
        match self {
            MemoryUnit::GiB => finite_or_zero(gib),
            MemoryUnit::MiB => to_mib(gib),
        }
    }

    fn format(self, gib: f64) -> String {
        match self {
            MemoryUnit::GiB => format!("{:.2} GiB", finite_or_zero(gib)),
            MemoryUnit::MiB => format!("{} MiB", to_mib(gib)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_exactness() {
        assert_eq!(to_millicores(1.0), 1000.0);
        assert_eq!(to_mib(1.0), 1024.0);
    }

    #[test]
    fn test_cpu_formatting() {
        assert_eq!(CpuUnit::Cores.format(2.5), "2.50 cores");
        assert_eq!(CpuUnit::Millicores.format(2.5), "2500 m");
        assert_eq!(CpuUnit::Millicores.format(0.1234), "123 m");
    }

    #[test]
    fn test_memory_formatting() {
        assert_eq!(MemoryUnit::GiB.format(20.0), "20.00 GiB");
        assert_eq!(MemoryUnit::MiB.format(1.5), "1536 MiB");
    }

    #[test]
    fn test_non_finite_displays_as_zero() {
        assert_eq!(CpuUnit::Cores.format(f64::NAN), "0.00 cores");
        assert_eq!(CpuUnit::Millicores.format(f64::INFINITY), "0 m");
        assert_eq!(MemoryUnit::MiB.display(f64::NEG_INFINITY).value, 0.0);
    }

    #[test]
    fn test_tiny_negatives_round_to_unsigned_zero() {
        assert_eq!(CpuUnit::Millicores.format(-0.0001), "0 m");
        assert_eq!(MemoryUnit::MiB.format(-0.0001), "0 MiB");
        assert_eq!(CpuUnit::Cores.format(-0.0), "0.00 cores");
        assert!(to_mib(-0.0001).is_sign_positive());
    }

    #[test]
    fn test_unit_names() {
        let unit: CpuUnit = serde_json::from_str("\"millicores\"").unwrap();
        assert_eq!(unit, CpuUnit::Millicores);
        let unit: MemoryUnit = serde_json::from_str("\"MiB\"").unwrap();
        assert_eq!(unit, MemoryUnit::MiB);
    }
}
