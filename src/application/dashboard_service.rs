// Dashboard service - Use case for building the totals and charts view
use crate::domain::chart::{self, Resource};
use crate::domain::dashboard::{ClusterSummary, Dashboard, ResourceUsage, TileData, ViewSettings};
use crate::domain::model::Model;
use crate::domain::totals::{ClusterUtilization, Totals, Utilization};
use crate::domain::units::DisplayUnit;

const DASHBOARD_TITLE: &str = "Kubernetes Cluster Growth Modeler";
const NO_MAX_SET: &str = "no max set";

#[derive(Debug, Clone)]
pub struct DashboardService {
    defaults: ViewSettings,
}

impl DashboardService {
    pub fn new(defaults: ViewSettings) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> ViewSettings {
        self.defaults
    }

    /// Recompute everything from the given snapshot.
    pub fn get_dashboard(&self, model: &Model, settings: ViewSettings) -> Dashboard {
        let totals = Totals::compute(model);

        let tiles = vec![
            TileData::new(
                "total-cpu",
                "Total CPU",
                "All clusters",
                settings.cpu_unit.display(totals.grand.cpu_cores),
            ),
            TileData::new(
                "total-memory",
                "Total Memory",
                "All clusters",
                settings.memory_unit.display(totals.grand.memory_gib),
            ),
        ];

        let clusters = model
            .clusters
            .iter()
            .zip(&totals.clusters)
            .map(|(cluster, total)| {
                let utilization = ClusterUtilization::new(cluster, total);
                ClusterSummary {
                    cluster_id: cluster.id.clone(),
                    name: cluster.name.clone(),
                    workload_count: cluster.workloads.len(),
                    cpu: usage(utilization.cpu, settings.cpu_unit),
                    memory: usage(utilization.memory, settings.memory_unit),
                }
            })
            .collect();

        let units = settings.units();
        let charts = [Resource::Cpu, Resource::Memory]
            .into_iter()
            .map(|resource| {
                chart::project(model, &totals.clusters, resource, units, settings.stack_by_workload)
            })
            .collect();

        tracing::debug!(
            "Built dashboard for {} clusters (stacked={})",
            model.clusters.len(),
            settings.stack_by_workload
        );

        Dashboard {
            title: DASHBOARD_TITLE.to_string(),
            settings,
            tiles,
            clusters,
            charts,
        }
    }
}

fn usage<U: DisplayUnit>(utilization: Utilization, unit: U) -> ResourceUsage {
    let used = unit.display(utilization.used);
    let capacity = utilization.capacity.map(|c| unit.display(c));
    let label = match &capacity {
        Some(cap) => format!("{} / {}", used.text, cap.text),
        None => format!("{} / {}", used.text, NO_MAX_SET),
    };

    ResourceUsage {
        used,
        capacity,
        percent: utilization.percent,
        over_capacity: utilization.over_capacity,
        label,
    }
}
