use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::graph::{LinkGraphJob, NodeId};
use crate::path::{PathRef, PathStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    /// Searched before with no cycle underneath; skip on revisit.
    Resolved,
    /// On the current DFS spine, via this first-hop path node.
    At(PathRef),
}

/// Cancels directed flow cycles that incremental assignment from different
/// sweeps can create within one origin's paths, and folds parallel path
/// fragments with the same first hop into one.
pub struct CycleEliminator<'a> {
    job: &'a mut LinkGraphJob,
    store: &'a mut PathStore,
    pub canceled: u64,
}

impl<'a> CycleEliminator<'a> {
    pub fn new(job: &'a mut LinkGraphJob, store: &'a mut PathStore) -> Self {
        Self {
            job,
            store,
            canceled: 0,
        }
    }

    /// Search every origin for cycles. Returns whether any were canceled.
    pub fn run(&mut self) -> bool {
        let size = self.job.size();
        let mut visit = vec![Visit::Unseen; size];
        let mut found = false;
        for node in 0..size {
            visit.fill(Visit::Unseen);
            let here = self.eliminate_from(&mut visit, NodeId(node), NodeId(node));
            found = here || found;
        }
        found
    }

    fn eliminate_from(&mut self, visit: &mut [Visit], origin: NodeId, next: NodeId) -> bool {
        match visit[next.0] {
            Visit::Resolved => false,
            Visit::At(begin) => {
                let flow = self.find_cycle_flow(visit, begin);
                if flow > 0 {
                    self.cancel_cycle(visit, begin, flow);
                    self.canceled += 1;
                    true
                } else {
                    false
                }
            }
            Visit::Unseen => {
                // Fold paths with the same origin and first hop into one
                // representative before descending.
                let mut next_hops: BTreeMap<usize, PathRef> = BTreeMap::new();
                let registered: Vec<PathRef> = self.job.paths_at(next).to_vec();
                for path in registered {
                    if self.store.get(path).origin() != Some(origin) {
                        continue;
                    }
                    let hop = self.store.get(path).node().0;
                    match next_hops.entry(hop) {
                        Entry::Vacant(entry) => {
                            entry.insert(path);
                        }
                        Entry::Occupied(entry) => {
                            self.store.transfer_flow(path, *entry.get());
                        }
                    }
                }
                let mut found = false;
                for (_, child) in next_hops {
                    if self.store.get(child).flow() == 0 {
                        continue;
                    }
                    visit[next.0] = Visit::At(child);
                    let hop = self.store.get(child).node();
                    let here = self.eliminate_from(visit, origin, hop);
                    found = here || found;
                }
                // A canceled cycle can expose another one below this node,
                // so only a cycle-free search marks it resolved.
                visit[next.0] = if found { Visit::Unseen } else { Visit::Resolved };
                found
            }
        }
    }

    fn find_cycle_flow(&self, visit: &[Visit], begin: PathRef) -> u64 {
        let mut flow = u64::MAX;
        let mut current = begin;
        loop {
            flow = flow.min(self.store.get(current).flow());
            current = self.next_on_cycle(visit, current);
            if current == begin {
                return flow;
            }
        }
    }

    fn cancel_cycle(&mut self, visit: &[Visit], begin: PathRef, flow: u64) {
        let mut current = begin;
        loop {
            let from = self.store.get(current).node();
            self.store.reduce_flow(current, flow);
            current = self.next_on_cycle(visit, current);
            self.job
                .remove_edge_flow(from, self.store.get(current).node(), flow);
            if current == begin {
                return;
            }
        }
    }

    fn next_on_cycle(&self, visit: &[Visit], current: PathRef) -> PathRef {
        match visit[self.store.get(current).node().0] {
            Visit::At(next) => next,
            _ => unreachable!("cycle chain interrupted"),
        }
    }
}
