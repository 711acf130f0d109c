//! Multi-commodity flow routing for capacitated transport link graphs.
//!
//! Demand between station pairs is assigned to concrete paths in two
//! passes: a saturating pass that fills shortest paths up to a capacity
//! cap and cancels the flow cycles incremental assignment leaves behind,
//! and a forced pass that pushes whatever demand remains onto the paths
//! laid down before, overloading links where it must.

pub mod flowmap;
pub mod graph;
pub mod path;
pub mod solver;

pub use graph::{JobError, JobSettings, LinkGraphJob, NodeId, StationId};
pub use path::{PathNode, PathRef, PathStore};

/// Counters describing one solver run. Purely informational.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveStats {
    pub first_pass_sweeps: u64,
    pub cycle_rounds: u64,
    pub cycles_canceled: u64,
    pub second_pass_sweeps: u64,
    pub flow_pushed: u64,
    pub demand_left: u64,
}

/// Result of a solver run. The store owns every surviving path node; the
/// refs recorded at the job's nodes resolve against it.
#[derive(Debug)]
pub struct SolveResult {
    pub paths: PathStore,
    pub stats: SolveStats,
}

/// Route all demand in the job. On return the job's edge flows, remaining
/// demands, flow shares and per-node path registrations describe the
/// computed assignment.
pub fn solve(job: &mut LinkGraphJob) -> SolveResult {
    let mut store = PathStore::new();
    let mut stats = SolveStats::default();
    solver::first_pass::run(job, &mut store, &mut stats);
    flowmap::map_flows(job, &store);
    solver::second_pass::run(job, &mut store, &mut stats);
    stats.demand_left = job.total_unsatisfied();
    SolveResult {
        paths: store,
        stats,
    }
}
