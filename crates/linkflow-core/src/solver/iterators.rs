use std::collections::BTreeMap;

use crate::graph::{LinkGraphJob, NodeId, StationId};

/// Source of outgoing edges for one Dijkstra expansion. The job is passed
/// by argument so iterators carry only cursor state.
pub trait EdgeIterator {
    fn new(job: &LinkGraphJob) -> Self;

    fn set_node(&mut self, job: &LinkGraphJob, source: NodeId, node: NodeId);

    fn next_target(&mut self, job: &LinkGraphJob) -> Option<NodeId>;
}

/// Walks the real outgoing links of the current node. Self-links are
/// consumption markers, not edges, and are skipped.
pub struct GraphEdgeIterator {
    node: NodeId,
    cursor: usize,
}

impl EdgeIterator for GraphEdgeIterator {
    fn new(_job: &LinkGraphJob) -> Self {
        Self {
            node: NodeId(0),
            cursor: 0,
        }
    }

    fn set_node(&mut self, _job: &LinkGraphJob, _source: NodeId, node: NodeId) {
        self.node = node;
        self.cursor = 0;
    }

    fn next_target(&mut self, job: &LinkGraphJob) -> Option<NodeId> {
        loop {
            let target = job.links(self.node).get(self.cursor).copied()?;
            self.cursor += 1;
            if target != self.node {
                return Some(target);
            }
        }
    }
}

/// Walks only the next hops that carry flow shares rooted at the current
/// source, in share order. Shares naming a station absent from the job are
/// caller-seeded leftovers and are skipped.
pub struct FlowEdgeIterator {
    station_to_node: BTreeMap<StationId, NodeId>,
    pending: Vec<NodeId>,
    cursor: usize,
}

impl EdgeIterator for FlowEdgeIterator {
    fn new(job: &LinkGraphJob) -> Self {
        let mut station_to_node = BTreeMap::new();
        for node in 0..job.size() {
            station_to_node.insert(job.station(NodeId(node)), NodeId(node));
        }
        Self {
            station_to_node,
            pending: Vec::new(),
            cursor: 0,
        }
    }

    fn set_node(&mut self, job: &LinkGraphJob, source: NodeId, node: NodeId) {
        self.pending.clear();
        self.cursor = 0;
        if let Some(stat) = job.flows(node).get(&job.station(source)) {
            for (_, next_hop) in stat.shares() {
                if let Some(&target) = self.station_to_node.get(&next_hop) {
                    if target != node {
                        self.pending.push(target);
                    }
                }
            }
        }
    }

    fn next_target(&mut self, _job: &LinkGraphJob) -> Option<NodeId> {
        let target = self.pending.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(target)
    }
}
