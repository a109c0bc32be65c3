// Resource totals derived from the model
use serde::Serialize;

use super::model::{Cluster, Model};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterTotal {
    pub cluster_id: String,
    pub name: String,
    pub cpu_cores: f64,
    pub memory_gib: f64,
}

impl ClusterTotal {
    pub fn of(cluster: &Cluster) -> Self {
        let (cpu_cores, memory_gib) = cluster
            .workloads
            .iter()
            .fold((0.0, 0.0), |(cpu, mem), w| {
                (cpu + w.total_cpu_cores(), mem + w.total_memory_gib())
            });

        Self {
            cluster_id: cluster.id.clone(),
            name: cluster.name.clone(),
            cpu_cores,
            memory_gib,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GrandTotal {
    pub cpu_cores: f64,
    pub memory_gib: f64,
}

impl GrandTotal {
    pub fn of(clusters: &[ClusterTotal]) -> Self {
        clusters.iter().fold(Self::default(), |acc, t| Self {
            cpu_cores: acc.cpu_cores + t.cpu_cores,
            memory_gib: acc.memory_gib + t.memory_gib,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub clusters: Vec<ClusterTotal>,
    pub grand: GrandTotal,
}

impl Totals {
    /// Recompute every total from the given snapshot. Cluster order is preserved.
    pub fn compute(model: &Model) -> Self {
        let clusters: Vec<ClusterTotal> = model.clusters.iter().map(ClusterTotal::of).collect();
        let grand = GrandTotal::of(&clusters);
        Self { clusters, grand }
    }
}

/// Usage of one resource against an optional capacity ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Utilization {
    pub used: f64,
    pub capacity: Option<f64>,
    /// `None` when no ceiling is set, so it can be shown as "not set" rather than 0%.
    pub percent: Option<u32>,
    pub over_capacity: bool,
}

impl Utilization {
    pub fn new(used: f64, capacity: Option<f64>) -> Self {
        let capacity = capacity.filter(|c| c.is_finite() && *c > 0.0);
        let percent = capacity.map(|cap| {
            let pct = (used / cap * 100.0).round();
            if pct.is_finite() { pct.clamp(0.0, 100.0) as u32 } else { 0 }
        });
        let over_capacity = capacity.is_some_and(|cap| used > cap);

        Self {
            used,
            capacity,
            percent,
            over_capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusterUtilization {
    pub cpu: Utilization,
    pub memory: Utilization,
}

impl ClusterUtilization {
    pub fn new(cluster: &Cluster, total: &ClusterTotal) -> Self {
        Self {
            cpu: Utilization::new(total.cpu_cores, cluster.max_cpu_cores),
            memory: Utilization::new(total.memory_gib, cluster.max_memory_gib),
        }
    }
}
