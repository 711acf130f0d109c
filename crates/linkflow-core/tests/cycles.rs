use linkflow_core::graph::{JobSettings, LinkGraphJob, NodeId, StationId};
use linkflow_core::solve;
use linkflow_core::solver::cycles::CycleEliminator;

fn build_job(size: usize) -> LinkGraphJob {
    let stations = (0..size).map(|i| StationId(1 + i as u32)).collect();
    LinkGraphJob::new(
        stations,
        JobSettings {
            accuracy: 1,
            max_saturation: Some(100),
        },
    )
    .unwrap()
}

fn flow(job: &LinkGraphJob, from: usize, to: usize) -> u64 {
    job.edge(NodeId(from), NodeId(to)).flow()
}

/// A later sweep reroutes the remaining demand towards node 1 through
/// node 2, opposite in sense to the earlier assignment through node 1.
/// The two fragments of origin 0 form the directed cycle 1 -> 2 -> 1,
/// which elimination must cancel at its minimum flow.
#[test]
fn opposing_reroutes_cancel_around_a_triangle() {
    let mut job = build_job(3);
    job.add_link(NodeId(0), NodeId(1), 10, 1).unwrap();
    job.add_link(NodeId(1), NodeId(2), 10, 1).unwrap();
    job.add_link(NodeId(2), NodeId(1), 10, 1).unwrap();
    job.add_link(NodeId(0), NodeId(2), 10, 8).unwrap();
    job.set_demand(NodeId(0), NodeId(1), 12).unwrap();
    job.set_demand(NodeId(0), NodeId(2), 4).unwrap();

    let mut result = solve(&mut job);
    assert_eq!(result.stats.cycles_canceled, 1);
    assert_eq!(result.stats.demand_left, 0);
    assert_eq!(flow(&job, 0, 1), 14);
    assert_eq!(flow(&job, 1, 2), 2);
    assert_eq!(flow(&job, 0, 2), 2);
    assert_eq!(flow(&job, 2, 1), 0);

    // Elimination is idempotent once the solver has terminated.
    let mut eliminator = CycleEliminator::new(&mut job, &mut result.paths);
    assert!(!eliminator.run());
    assert_eq!(eliminator.canceled, 0);
}

/// Opposing flows of different origins share node 1 in opposite senses.
/// That is not a flow cycle: per-origin flow is conserved, so nothing may
/// be canceled.
#[test]
fn opposing_origins_do_not_cancel() {
    let mut job = build_job(3);
    job.add_link(NodeId(0), NodeId(1), 10, 1).unwrap();
    job.add_link(NodeId(1), NodeId(2), 10, 1).unwrap();
    job.add_link(NodeId(2), NodeId(1), 10, 1).unwrap();
    job.add_link(NodeId(1), NodeId(0), 10, 1).unwrap();
    job.set_demand(NodeId(0), NodeId(2), 6).unwrap();
    job.set_demand(NodeId(2), NodeId(0), 6).unwrap();

    let mut result = solve(&mut job);
    assert_eq!(result.stats.cycles_canceled, 0);
    assert_eq!(result.stats.demand_left, 0);
    assert_eq!(flow(&job, 0, 1), 6);
    assert_eq!(flow(&job, 1, 2), 6);
    assert_eq!(flow(&job, 2, 1), 6);
    assert_eq!(flow(&job, 1, 0), 6);

    let mut eliminator = CycleEliminator::new(&mut job, &mut result.paths);
    assert!(!eliminator.run());
}

/// No path node may sit on a self-loop, and every flow-carrying node must
/// chain back towards its origin.
#[test]
fn surviving_paths_are_well_formed() {
    let mut job = build_job(3);
    job.add_link(NodeId(0), NodeId(1), 10, 1).unwrap();
    job.add_link(NodeId(1), NodeId(2), 10, 1).unwrap();
    job.add_link(NodeId(2), NodeId(1), 10, 1).unwrap();
    job.add_link(NodeId(0), NodeId(2), 10, 8).unwrap();
    job.set_demand(NodeId(0), NodeId(1), 12).unwrap();
    job.set_demand(NodeId(0), NodeId(2), 4).unwrap();

    let result = solve(&mut job);
    for node in 0..job.size() {
        for &path in job.paths_at(NodeId(node)) {
            let path = result.paths.get(path);
            assert_ne!(path.node(), NodeId(node));
            if path.flow() > 0 {
                assert!(path.origin().is_some());
            }
        }
        // Edge flow is exactly the sum of the registered paths over it.
        for hop in 0..job.size() {
            let over_edge: u64 = job
                .paths_at(NodeId(node))
                .iter()
                .map(|&path| result.paths.get(path))
                .filter(|path| path.node() == NodeId(hop))
                .map(|path| path.flow())
                .sum();
            assert_eq!(over_edge, job.edge(NodeId(node), NodeId(hop)).flow());
        }
    }
}
