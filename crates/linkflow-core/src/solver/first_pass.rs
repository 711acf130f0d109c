use crate::graph::{LinkGraphJob, NodeId};
use crate::path::PathStore;
use crate::solver::annotation::DistanceAnnotation;
use crate::solver::cycles::CycleEliminator;
use crate::solver::iterators::GraphEdgeIterator;
use crate::solver::McfContext;
use crate::SolveStats;

/// Saturating pass: sweep all sources with distance-graded Dijkstra over
/// the real link graph, pushing demand onto paths while they have free
/// capacity, then cancel the flow cycles the sweep introduced. Repeats
/// until neither more flow nor more cycles can be found.
pub fn run(job: &mut LinkGraphJob, store: &mut PathStore, stats: &mut SolveStats) {
    let max_saturation = job.settings().max_saturation;
    let mut paths = Vec::new();
    loop {
        let mut more_loops = false;
        {
            let mut ctx = McfContext::new(job, store, max_saturation);
            for source in 0..ctx.size() {
                let source = NodeId(source);
                ctx.dijkstra::<DistanceAnnotation, GraphEdgeIterator>(source, &mut paths);
                for dest in 0..ctx.size() {
                    let dest = NodeId(dest);
                    if ctx.job.edge(source, dest).unsatisfied_demand() == 0 {
                        continue;
                    }
                    let path = paths[dest.0].expect("no path computed for destination");
                    let free_capacity = ctx.store.get(path).free_capacity();
                    let mut handled = false;
                    if free_capacity > 0 {
                        let pushed = ctx.push_flow(source, dest, path, max_saturation);
                        stats.flow_pushed += pushed;
                        if pushed > 0 {
                            more_loops = more_loops
                                || ctx.job.edge(source, dest).unsatisfied_demand() > 0;
                            handled = true;
                        }
                    }
                    if !handled {
                        // A pair that could not be routed within the cap
                        // gets one uncapped shot while none of its demand
                        // has been assigned yet.
                        let edge = ctx.job.edge(source, dest);
                        if edge.unsatisfied_demand() == edge.demand()
                            && free_capacity > i64::MIN
                        {
                            stats.flow_pushed += ctx.push_flow(source, dest, path, None);
                        }
                    }
                }
                ctx.cleanup_paths(source, &mut paths);
            }
        }
        stats.first_pass_sweeps += 1;
        if more_loops {
            continue;
        }
        let mut eliminator = CycleEliminator::new(job, store);
        let found = eliminator.run();
        stats.cycles_canceled += eliminator.canceled;
        if !found {
            break;
        }
        stats.cycle_rounds += 1;
    }
}
