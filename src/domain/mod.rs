// Domain layer - Pure model types and derivations
pub mod chart;
pub mod dashboard;
pub mod model;
pub mod totals;
pub mod units;
