// Dashboard domain model
use serde::{Deserialize, Serialize};

use super::chart::{ChartProjection, ChartUnits};
use super::units::{CpuUnit, DisplayQuantity, MemoryUnit};

/// View-only state: never touches stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub cpu_unit: CpuUnit,
    #[serde(default)]
    pub memory_unit: MemoryUnit,
    #[serde(default = "default_stack_by_workload")]
    pub stack_by_workload: bool,
}

fn default_stack_by_workload() -> bool {
    true
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            cpu_unit: CpuUnit::default(),
            memory_unit: MemoryUnit::default(),
            stack_by_workload: default_stack_by_workload(),
        }
    }
}

impl ViewSettings {
    pub fn units(&self) -> ChartUnits {
        ChartUnits {
            cpu: self.cpu_unit,
            memory: self.memory_unit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub value: DisplayQuantity,
}

impl TileData {
    pub fn new(id: &str, title: &str, subtitle: &str, value: DisplayQuantity) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceUsage {
    pub used: DisplayQuantity,
    pub capacity: Option<DisplayQuantity>,
    pub percent: Option<u32>,
    pub over_capacity: bool,
    /// "used / capacity", or "used / no max set".
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub cluster_id: String,
    pub name: String,
    pub workload_count: usize,
    pub cpu: ResourceUsage,
    pub memory: ResourceUsage,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub settings: ViewSettings,
    pub tiles: Vec<TileData>,
    pub clusters: Vec<ClusterSummary>,
    pub charts: Vec<ChartProjection>,
}
