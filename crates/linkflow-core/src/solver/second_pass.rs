use crate::graph::{LinkGraphJob, NodeId};
use crate::path::PathStore;
use crate::solver::annotation::CapacityAnnotation;
use crate::solver::iterators::FlowEdgeIterator;
use crate::solver::McfContext;
use crate::SolveStats;

/// Forced assignment pass: capacity-graded Dijkstra restricted to the
/// edges already carrying flow shares, assigning whatever demand remains
/// even where that overloads links. The saturation cap is off throughout.
pub fn run(job: &mut LinkGraphJob, store: &mut PathStore, stats: &mut SolveStats) {
    let mut paths = Vec::new();
    let mut ctx = McfContext::new(job, store, None);
    loop {
        let mut demand_left = false;
        for source in 0..ctx.size() {
            let source = NodeId(source);
            ctx.dijkstra::<CapacityAnnotation, FlowEdgeIterator>(source, &mut paths);
            for dest in 0..ctx.size() {
                let dest = NodeId(dest);
                if ctx.job.edge(source, dest).unsatisfied_demand() == 0 {
                    continue;
                }
                let path = paths[dest.0].expect("no path computed for destination");
                if ctx.store.get(path).free_capacity() > i64::MIN {
                    stats.flow_pushed += ctx.push_flow(source, dest, path, None);
                    if ctx.job.edge(source, dest).unsatisfied_demand() > 0 {
                        demand_left = true;
                    }
                }
            }
            ctx.cleanup_paths(source, &mut paths);
        }
        stats.second_pass_sweeps += 1;
        if !demand_left {
            return;
        }
    }
}
