use std::cmp::Reverse;

use crate::graph::NodeId;
use crate::path::{capacity_ratio, PathNode, UNREACHED_DISTANCE};

/// Grading policy for the modified Dijkstra: decides whether extending one
/// path by an edge beats the path currently held, and defines the total
/// order of the frontier. Keys embed the node id so no two distinct nodes
/// ever compare equal.
pub trait AnnotationPolicy {
    type Key: Ord + Copy;

    fn frontier_key(path: &PathNode, node: NodeId) -> Self::Key;

    fn is_better(
        current: &PathNode,
        base: &PathNode,
        capacity: u64,
        free_capacity: i64,
        distance: u64,
    ) -> bool;
}

/// Shortest-path grading with a capacity tier: any path with free capacity
/// beats any path without, and distance decides within a tier. Only the
/// prefix through `base` is consulted; the candidate edge's own capacities
/// do not enter the decision.
pub struct DistanceAnnotation;

impl AnnotationPolicy for DistanceAnnotation {
    type Key = (u64, usize);

    fn frontier_key(path: &PathNode, node: NodeId) -> Self::Key {
        (path.distance(), node.0)
    }

    fn is_better(
        current: &PathNode,
        base: &PathNode,
        _capacity: u64,
        _free_capacity: i64,
        distance: u64,
    ) -> bool {
        if base.distance() == UNREACHED_DISTANCE {
            return false;
        }
        if current.distance() == UNREACHED_DISTANCE {
            return true;
        }
        if base.free_capacity() > 0 {
            if current.free_capacity() > 0 {
                base.distance() + distance < current.distance()
            } else {
                true
            }
        } else if current.free_capacity() > 0 {
            false
        } else {
            base.distance() + distance < current.distance()
        }
    }
}

/// Widest-path grading: maximize the capacity ratio the extended path would
/// have, tie-broken by distance. Ratios only shrink as edges are appended,
/// which is what keeps Dijkstra's greedy finalization valid.
pub struct CapacityAnnotation;

impl AnnotationPolicy for CapacityAnnotation {
    type Key = (Reverse<i64>, Reverse<usize>);

    fn frontier_key(path: &PathNode, node: NodeId) -> Self::Key {
        (Reverse(path.capacity_ratio()), Reverse(node.0))
    }

    fn is_better(
        current: &PathNode,
        base: &PathNode,
        capacity: u64,
        free_capacity: i64,
        distance: u64,
    ) -> bool {
        let extended = capacity_ratio(
            base.free_capacity().min(free_capacity),
            base.capacity().min(capacity),
        );
        let held = current.capacity_ratio();
        if extended == held {
            base.distance() != UNREACHED_DISTANCE
                && base.distance() + distance < current.distance()
        } else {
            extended > held
        }
    }
}
