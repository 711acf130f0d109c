use crate::graph::{LinkGraphJob, NodeId};
use crate::path::PathStore;

/// Project the flow-carrying path nodes into per-node share maps: at every
/// node, each departing path contributes a share of its flow towards the
/// station of its first hop, keyed by the origin's station. The forced
/// pass iterates exactly these shares.
pub fn map_flows(job: &mut LinkGraphJob, store: &PathStore) {
    for node in 0..job.size() {
        let node = NodeId(node);
        let registered = job.paths_at(node).to_vec();
        for path in registered {
            let path = store.get(path);
            if path.flow() == 0 {
                continue;
            }
            let origin = path.origin().expect("flowing path without an origin");
            debug_assert_ne!(path.node(), node);
            debug_assert_ne!(path.node(), origin);
            let origin_station = job.station(origin);
            let via = job.station(path.node());
            job.add_flow_share(node, origin_station, via, path.flow());
        }
    }
}
