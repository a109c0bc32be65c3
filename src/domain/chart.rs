// Chart rows projected from the model, ready for a bar chart component
use serde::Serialize;

use super::model::{Cluster, Model};
use super::totals::ClusterTotal;
use super::units::{CpuUnit, DisplayUnit, MemoryUnit};

/// Series colours, assigned by first-seen workload name index.
pub const BAR_COLORS: [&str; 5] = ["#FF3E3E", "#FFB000", "#00E5FF", "#9C27FF", "#33FF57"];

pub const TOTAL_SERIES: &str = "total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Cpu,
    Memory,
}

impl Resource {
    fn total_color(self) -> &'static str {
        match self {
            Resource::Cpu => BAR_COLORS[2],
            Resource::Memory => BAR_COLORS[1],
        }
    }

    fn capacity(self, cluster: &Cluster) -> Option<f64> {
        match self {
            Resource::Cpu => cluster.max_cpu_cores,
            Resource::Memory => cluster.max_memory_gib,
        }
        .filter(|c| *c > 0.0)
    }
}

/// Display units selected for the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartUnits {
    pub cpu: CpuUnit,
    pub memory: MemoryUnit,
}

impl ChartUnits {
    fn scale(&self, resource: Resource, canonical: f64) -> f64 {
        match resource {
            Resource::Cpu => self.cpu.scale(canonical),
            Resource::Memory => self.memory.scale(canonical),
        }
    }

    fn symbol(&self, resource: Resource) -> &'static str {
        match resource {
            Resource::Cpu => self.cpu.symbol(),
            Resource::Memory => self.memory.symbol(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSegment {
    pub workload: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChartValues {
    Total { total: f64 },
    Stacked { segments: Vec<ChartSegment> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub cluster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    pub values: ChartValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesKey {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProjection {
    pub resource: Resource,
    pub unit: String,
    pub stacked: bool,
    pub rows: Vec<ChartRow>,
    pub series: Vec<SeriesKey>,
}

/// Distinct workload names across the whole model, in first-seen order.
pub fn workload_names(model: &Model) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for workload in model.clusters.iter().flat_map(|c| c.workloads.iter()) {
        if !names.iter().any(|n| n == &workload.name) {
            names.push(workload.name.clone());
        }
    }
    names
}

fn stacked_row(cluster: &Cluster, resource: Resource, units: &ChartUnits) -> ChartRow {
    let mut segments: Vec<ChartSegment> = Vec::new();
    for workload in &cluster.workloads {
        let canonical = match resource {
            Resource::Cpu => workload.total_cpu_cores(),
            Resource::Memory => workload.total_memory_gib(),
        };
        // Same-named workloads in one cluster share a segment.
        match segments.iter_mut().find(|s| s.workload == workload.name) {
            Some(segment) => segment.value += units.scale(resource, canonical),
            None => segments.push(ChartSegment {
                workload: workload.name.clone(),
                value: units.scale(resource, canonical),
            }),
        }
    }

    ChartRow {
        cluster: cluster.name.clone(),
        capacity: resource.capacity(cluster).map(|c| units.scale(resource, c)),
        values: ChartValues::Stacked { segments },
    }
}

fn total_row(
    cluster: &Cluster,
    total: &ClusterTotal,
    resource: Resource,
    units: &ChartUnits,
) -> ChartRow {
    let canonical = match resource {
        Resource::Cpu => total.cpu_cores,
        Resource::Memory => total.memory_gib,
    };

    ChartRow {
        cluster: total.name.clone(),
        capacity: resource.capacity(cluster).map(|c| units.scale(resource, c)),
        values: ChartValues::Total {
            total: units.scale(resource, canonical),
        },
    }
}

/// Reshape the model into one chart row per cluster.
///
/// Stacked mode yields one segment per workload name; flat mode yields the cluster total.
/// `totals` is positional: entry `i` belongs to `model.clusters[i]`.
pub fn project(
    model: &Model,
    totals: &[ClusterTotal],
    resource: Resource,
    units: ChartUnits,
    stacked: bool,
) -> ChartProjection {
    let (rows, series) = if stacked {
        let rows = model
            .clusters
            .iter()
            .map(|c| stacked_row(c, resource, &units))
            .collect();
        let series = workload_names(model)
            .into_iter()
            .enumerate()
            .map(|(i, name)| SeriesKey {
                name,
                color: BAR_COLORS[i % BAR_COLORS.len()].to_string(),
            })
            .collect();
        (rows, series)
    } else {
        let rows = model
            .clusters
            .iter()
            .zip(totals)
            .map(|(c, t)| total_row(c, t, resource, &units))
            .collect();
        let series = vec![SeriesKey {
            name: TOTAL_SERIES.to_string(),
            color: resource.total_color().to_string(),
        }];
        (rows, series)
    };

    ChartProjection {
        resource,
        unit: units.symbol(resource).to_string(),
        stacked,
        rows,
        series,
    }
}
