use std::collections::BTreeSet;

use crate::graph::{LinkGraphJob, NodeId};
use crate::path::{PathRef, PathStore};

pub mod annotation;
pub mod cycles;
pub mod first_pass;
pub mod iterators;
pub mod second_pass;

use annotation::AnnotationPolicy;
use iterators::EdgeIterator;

/// Shared machinery of both passes: the modified Dijkstra, the flow pusher
/// and the per-source path cleanup, parameterized by the saturation cap.
pub(crate) struct McfContext<'a> {
    pub(crate) job: &'a mut LinkGraphJob,
    pub(crate) store: &'a mut PathStore,
    max_saturation: Option<u32>,
    accuracy: u64,
}

impl<'a> McfContext<'a> {
    pub(crate) fn new(
        job: &'a mut LinkGraphJob,
        store: &'a mut PathStore,
        max_saturation: Option<u32>,
    ) -> Self {
        let accuracy = job.settings().accuracy;
        Self {
            job,
            store,
            max_saturation,
            accuracy,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.job.size()
    }

    /// Build a full path tree rooted at `source`. Every node gets exactly
    /// one path; unreached nodes keep their sentinel annotation. A node is
    /// forked only while its key is out of the frontier, and a finalized
    /// node that improves again is simply re-inserted and re-expanded.
    pub(crate) fn dijkstra<A: AnnotationPolicy, I: EdgeIterator>(
        &mut self,
        source: NodeId,
        paths: &mut Vec<Option<PathRef>>,
    ) {
        let size = self.size();
        let mut iter = I::new(self.job);
        paths.clear();
        paths.resize(size, None);
        let mut frontier: BTreeSet<(A::Key, usize)> = BTreeSet::new();
        for node in 0..size {
            let path = if node == source.0 {
                self.store.alloc_source(NodeId(node))
            } else {
                self.store.alloc(NodeId(node))
            };
            paths[node] = Some(path);
            frontier.insert((A::frontier_key(self.store.get(path), NodeId(node)), node));
        }
        while let Some((_, from)) = frontier.pop_first() {
            let from = NodeId(from);
            let base = paths[from.0].expect("frontier entry without a path");
            iter.set_node(self.job, source, from);
            while let Some(to) = iter.next_target(self.job) {
                if to == from {
                    continue;
                }
                let edge = self.job.edge(from, to);
                assert!(edge.has_link(), "edge iteration yielded a missing link");
                let mut capacity = edge.capacity();
                if let Some(pct) = self.max_saturation {
                    capacity = ((capacity as u128 * u128::from(pct)) / 100).max(1) as u64;
                }
                let free_capacity = capacity as i64 - edge.flow() as i64;
                // Every hop costs one extra unit so direct links win over
                // equally long detours through intermediate stops.
                let distance = edge.distance() + 1;
                let target = paths[to.0].expect("dijkstra path slot missing");
                let (better, old_key) = {
                    let current = self.store.get(target);
                    (
                        A::is_better(
                            current,
                            self.store.get(base),
                            capacity,
                            free_capacity,
                            distance,
                        ),
                        A::frontier_key(current, to),
                    )
                };
                if better {
                    frontier.remove(&(old_key, to.0));
                    self.store.fork(target, base, capacity, free_capacity, distance);
                    frontier.insert((A::frontier_key(self.store.get(target), to), to.0));
                }
            }
        }
    }

    /// Assign one increment of the demand on `from -> to` along the path
    /// ending at `leaf`. Returns how much actually fit.
    pub(crate) fn push_flow(
        &mut self,
        from: NodeId,
        to: NodeId,
        leaf: PathRef,
        max_saturation: Option<u32>,
    ) -> u64 {
        let edge = self.job.edge(from, to);
        assert!(edge.unsatisfied_demand() > 0, "pushing satisfied demand");
        let amount = (edge.demand() / self.accuracy).clamp(1, edge.unsatisfied_demand());
        let pushed = self
            .store
            .add_flow(leaf, amount, self.job, max_saturation);
        self.job.satisfy_demand(from, to, pushed);
        pushed
    }

    /// Drop the tree parts that ended up without flow and release the
    /// source root. Flow-carrying nodes survive; they were registered at
    /// their departure nodes when the flow was pushed.
    pub(crate) fn cleanup_paths(&mut self, source: NodeId, paths: &mut Vec<Option<PathRef>>) {
        let Some(root) = paths[source.0].take() else {
            return;
        };
        for index in 0..paths.len() {
            let Some(mut current) = paths[index] else {
                continue;
            };
            if self.store.get(current).parent() == Some(root) {
                self.store.detach(current);
            }
            while current != root && self.store.get(current).flow() == 0 {
                let parent = self.store.get(current).parent();
                self.store.detach(current);
                if self.store.get(current).num_children() == 0 {
                    paths[self.store.get(current).node().0] = None;
                    self.store.free(current);
                }
                match parent {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        debug_assert_eq!(self.store.get(root).num_children(), 0);
        self.store.free(root);
        paths.clear();
    }
}
