// Cluster model domain: workloads, clusters and the root model
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Largest value any numeric field may hold (2^53 - 1).
pub const MAX_QUANTITY: f64 = 9_007_199_254_740_991.0;

/// Coerce a numeric input into `[0, MAX_QUANTITY]`. Non-finite input becomes 0.
pub fn clamp_quantity(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    value.min(MAX_QUANTITY)
}

/// Replica counts are whole numbers: round first, then clamp.
pub fn clamp_replicas(value: f64) -> u64 {
    clamp_quantity(value.round()) as u64
}

/// Parse free-form user input. Anything that is not a finite number becomes 0.
pub fn parse_quantity(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(clamp_quantity).unwrap_or(0.0)
}

pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn de_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_quantity)
}

fn de_optional_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(clamp_quantity))
}

fn de_replicas<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_replicas)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub id: String,
    pub name: String,
    #[serde(rename = "cpuCores", deserialize_with = "de_quantity")]
    pub cpu_cores: f64,
    #[serde(rename = "memoryGiB", deserialize_with = "de_quantity")]
    pub memory_gib: f64,
    #[serde(deserialize_with = "de_replicas")]
    pub replicas: u64,
}

impl Workload {
    pub fn new(name: impl Into<String>, cpu_cores: f64, memory_gib: f64, replicas: u64) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            cpu_cores: clamp_quantity(cpu_cores),
            memory_gib: clamp_quantity(memory_gib),
            replicas: replicas.min(MAX_QUANTITY as u64),
        }
    }

    /// A fresh workload as created from the UI: one core, one GiB, one replica.
    pub fn with_default_values(name: impl Into<String>) -> Self {
        Self::new(name, 1.0, 1.0, 1)
    }

    pub fn total_cpu_cores(&self) -> f64 {
        self.cpu_cores * self.replicas as f64
    }

    pub fn total_memory_gib(&self) -> f64 {
        self.memory_gib * self.replicas as f64
    }

    pub fn apply(&mut self, update: WorkloadUpdate) {
        match update {
            WorkloadUpdate::Name(name) => self.name = name,
            WorkloadUpdate::CpuCores(value) => self.cpu_cores = clamp_quantity(value),
            WorkloadUpdate::MemoryGiB(value) => self.memory_gib = clamp_quantity(value),
            WorkloadUpdate::Replicas(value) => self.replicas = clamp_replicas(value),
        }
    }
}

/// A single-field edit of a workload. Names are stored verbatim, numbers are clamped.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkloadUpdate {
    Name(String),
    CpuCores(f64),
    MemoryGiB(f64),
    Replicas(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityField {
    #[serde(rename = "maxCpuCores")]
    MaxCpuCores,
    #[serde(rename = "maxMemoryGiB")]
    MaxMemoryGiB,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(
        rename = "maxCpuCores",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_optional_quantity"
    )]
    pub max_cpu_cores: Option<f64>,
    #[serde(
        rename = "maxMemoryGiB",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_optional_quantity"
    )]
    pub max_memory_gib: Option<f64>,
    pub workloads: Vec<Workload>,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            max_cpu_cores: None,
            max_memory_gib: None,
            workloads: Vec::new(),
        }
    }

    pub fn with_capacity(mut self, max_cpu_cores: f64, max_memory_gib: f64) -> Self {
        self.max_cpu_cores = Some(clamp_quantity(max_cpu_cores));
        self.max_memory_gib = Some(clamp_quantity(max_memory_gib));
        self
    }

    pub fn with_workload(mut self, workload: Workload) -> Self {
        self.workloads.push(workload);
        self
    }

    pub fn set_capacity(&mut self, field: CapacityField, value: f64) {
        let value = Some(clamp_quantity(value));
        match field {
            CapacityField::MaxCpuCores => self.max_cpu_cores = value,
            CapacityField::MaxMemoryGiB => self.max_memory_gib = value,
        }
    }

    pub fn workload_mut(&mut self, workload_id: &str) -> Option<&mut Workload> {
        self.workloads.iter_mut().find(|w| w.id == workload_id)
    }
}

/// The whole persisted and exported state: an ordered list of clusters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    pub clusters: Vec<Cluster>,
}

impl Model {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Example model used on first run or when the stored copy is unreadable.
    pub fn seed() -> Self {
        Self::new(vec![
            Cluster::new("alva-prod")
                .with_capacity(100.0, 500.0)
                .with_workload(Workload::new("web-frontend", 2.0, 4.0, 5))
                .with_workload(Workload::new("api-backend", 3.0, 6.0, 3))
                .with_workload(Workload::new("postgres", 4.0, 16.0, 1)),
            Cluster::new("rwcm-prod")
                .with_capacity(80.0, 300.0)
                .with_workload(Workload::new("ingress-nginx", 1.0, 1.0, 4))
                .with_workload(Workload::new("metrics", 2.0, 8.0, 2)),
        ])
    }

    pub fn cluster_mut(&mut self, cluster_id: &str) -> Option<&mut Cluster> {
        self.clusters.iter_mut().find(|c| c.id == cluster_id)
    }

    pub fn position(&self, cluster_id: &str) -> Option<usize> {
        self.clusters.iter().position(|c| c.id == cluster_id)
    }

    pub fn workload_count(&self) -> usize {
        self.clusters.iter().map(|c| c.workloads.len()).sum()
    }

    /// Relocate the workload at `from_index` of one cluster to `to_index` of another (or the
    /// same) cluster. Returns false and leaves the model untouched when nothing moves.
    pub fn move_workload(
        &mut self,
        source_cluster_id: &str,
        from_index: usize,
        dest_cluster_id: &str,
        to_index: usize,
    ) -> bool {
        let (Some(source), Some(dest)) =
            (self.position(source_cluster_id), self.position(dest_cluster_id))
        else {
            return false;
        };
        if source == dest && from_index == to_index {
            return false;
        }
        if from_index >= self.clusters[source].workloads.len() {
            return false;
        }

        let moved = self.clusters[source].workloads.remove(from_index);
        let target = &mut self.clusters[dest].workloads;
        let at = to_index.min(target.len());
        target.insert(at, moved);
        true
    }
}
