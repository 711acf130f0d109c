use std::collections::{BTreeMap, BTreeSet};

use crate::graph::{JobError, NodeId, StationId};
use crate::path::PathRef;

/// Sentinel distance for a node pair without a direct link.
pub const NO_LINK: u64 = u64::MAX;

/// Upper bound on a single link distance. Keeps any chain of hops far away
/// from the unreached-path sentinel.
pub const DISTANCE_MAX: u64 = u32::MAX as u64;

/// Upper bound on capacities, demands and flows so that signed free-capacity
/// arithmetic cannot overflow.
pub const QUANTITY_MAX: u64 = (i64::MAX / 4) as u64;

#[derive(Debug, Clone, Copy)]
pub struct JobSettings {
    /// Demand is pushed in increments of roughly `demand / accuracy`.
    pub accuracy: u64,
    /// Percentage of each link's capacity usable during the saturating pass.
    /// `None` disables the cap.
    pub max_saturation: Option<u32>,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            accuracy: 16,
            max_saturation: Some(80),
        }
    }
}

impl JobSettings {
    fn validate(&self) -> Result<(), JobError> {
        if self.accuracy == 0 {
            return Err(JobError::InvalidInput(
                "accuracy must be at least 1".to_string(),
            ));
        }
        if let Some(pct) = self.max_saturation {
            if pct == 0 || pct > 100 {
                return Err(JobError::InvalidInput(
                    "max_saturation must lie in 1..=100".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    distance: u64,
    capacity: u64,
    flow: u64,
    demand: u64,
    unsatisfied_demand: u64,
}

impl Default for EdgeData {
    fn default() -> Self {
        Self {
            distance: NO_LINK,
            capacity: 0,
            flow: 0,
            demand: 0,
            unsatisfied_demand: 0,
        }
    }
}

impl EdgeData {
    pub fn has_link(&self) -> bool {
        self.distance != NO_LINK
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn flow(&self) -> u64 {
        self.flow
    }

    pub fn demand(&self) -> u64 {
        self.demand
    }

    pub fn unsatisfied_demand(&self) -> u64 {
        self.unsatisfied_demand
    }
}

/// Ordered share map describing how flow rooted at some origin leaves a node.
/// Keys are cumulative flow offsets, so iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct FlowStat {
    shares: BTreeMap<u64, StationId>,
}

impl FlowStat {
    pub fn append(&mut self, next_hop: StationId, amount: u64) {
        debug_assert!(amount > 0);
        let offset = self.shares.keys().next_back().copied().unwrap_or(0);
        self.shares.insert(offset + amount, next_hop);
    }

    pub fn shares(&self) -> impl Iterator<Item = (u64, StationId)> + '_ {
        self.shares.iter().map(|(&offset, &hop)| (offset, hop))
    }

    pub fn total(&self) -> u64 {
        self.shares.keys().next_back().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    station: StationId,
    links: Vec<NodeId>,
    paths: Vec<PathRef>,
    flows: BTreeMap<StationId, FlowStat>,
}

/// Immutable-topology snapshot of a link graph, plus the mutable flow and
/// demand state the solver works on. Nodes are indexed densely; edge state
/// is a dense matrix so demand can exist between pairs without a link.
#[derive(Debug, Clone)]
pub struct LinkGraphJob {
    nodes: Vec<NodeData>,
    edges: Vec<EdgeData>,
    settings: JobSettings,
}

impl LinkGraphJob {
    pub fn new(stations: Vec<StationId>, settings: JobSettings) -> Result<Self, JobError> {
        settings.validate()?;
        let unique: BTreeSet<StationId> = stations.iter().copied().collect();
        if unique.len() != stations.len() {
            return Err(JobError::InvalidInput(
                "station ids must be unique".to_string(),
            ));
        }
        let size = stations.len();
        let nodes = stations
            .into_iter()
            .map(|station| NodeData {
                station,
                links: Vec::new(),
                paths: Vec::new(),
                flows: BTreeMap::new(),
            })
            .collect();
        Ok(Self {
            nodes,
            edges: vec![EdgeData::default(); size * size],
            settings,
        })
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    pub fn station(&self, node: NodeId) -> StationId {
        self.nodes[node.0].station
    }

    pub fn add_link(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: u64,
        distance: u64,
    ) -> Result<(), JobError> {
        self.check_pair(from, to)?;
        if distance == 0 || distance > DISTANCE_MAX {
            return Err(JobError::InvalidInput(format!(
                "link distance {distance} outside 1..={DISTANCE_MAX}"
            )));
        }
        if capacity > QUANTITY_MAX {
            return Err(JobError::InvalidInput(
                "link capacity exceeds quantity bound".to_string(),
            ));
        }
        let idx = self.idx(from, to);
        if self.edges[idx].has_link() {
            return Err(JobError::InvalidInput(format!(
                "duplicate link {} -> {}",
                from.0, to.0
            )));
        }
        self.edges[idx].distance = distance;
        self.edges[idx].capacity = capacity;
        self.nodes[from.0].links.push(to);
        Ok(())
    }

    pub fn set_demand(&mut self, from: NodeId, to: NodeId, amount: u64) -> Result<(), JobError> {
        self.check_pair(from, to)?;
        if from == to {
            return Err(JobError::InvalidInput(
                "demand between a node and itself".to_string(),
            ));
        }
        if amount > QUANTITY_MAX {
            return Err(JobError::InvalidInput(
                "demand exceeds quantity bound".to_string(),
            ));
        }
        let idx = self.idx(from, to);
        self.edges[idx].demand = amount;
        self.edges[idx].unsatisfied_demand = amount;
        Ok(())
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> &EdgeData {
        &self.edges[self.idx(from, to)]
    }

    pub fn links(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].links
    }

    pub fn paths_at(&self, node: NodeId) -> &[PathRef] {
        &self.nodes[node.0].paths
    }

    pub fn flows(&self, node: NodeId) -> &BTreeMap<StationId, FlowStat> {
        &self.nodes[node.0].flows
    }

    pub fn add_flow_share(
        &mut self,
        node: NodeId,
        origin: StationId,
        next_hop: StationId,
        amount: u64,
    ) {
        self.nodes[node.0]
            .flows
            .entry(origin)
            .or_default()
            .append(next_hop, amount);
    }

    pub fn satisfy_demand(&mut self, from: NodeId, to: NodeId, amount: u64) {
        let idx = self.idx(from, to);
        let edge = &mut self.edges[idx];
        assert!(
            amount <= edge.unsatisfied_demand,
            "satisfying more demand than remains on {} -> {}",
            from.0,
            to.0
        );
        edge.unsatisfied_demand -= amount;
    }

    pub fn add_edge_flow(&mut self, from: NodeId, to: NodeId, amount: u64) {
        let idx = self.idx(from, to);
        let edge = &mut self.edges[idx];
        assert!(
            amount <= QUANTITY_MAX && edge.flow <= QUANTITY_MAX - amount,
            "edge flow overflow on {} -> {}",
            from.0,
            to.0
        );
        edge.flow += amount;
    }

    pub fn remove_edge_flow(&mut self, from: NodeId, to: NodeId, amount: u64) {
        let idx = self.idx(from, to);
        let edge = &mut self.edges[idx];
        assert!(
            amount <= edge.flow,
            "removing more flow than assigned on {} -> {}",
            from.0,
            to.0
        );
        edge.flow -= amount;
    }

    pub fn total_unsatisfied(&self) -> u64 {
        self.edges.iter().map(|edge| edge.unsatisfied_demand).sum()
    }

    pub(crate) fn register_path(&mut self, node: NodeId, path: PathRef) {
        self.nodes[node.0].paths.push(path);
    }

    fn check_pair(&self, from: NodeId, to: NodeId) -> Result<(), JobError> {
        if from.0 >= self.size() || to.0 >= self.size() {
            return Err(JobError::InvalidInput(
                "node id out of range".to_string(),
            ));
        }
        Ok(())
    }

    fn idx(&self, from: NodeId, to: NodeId) -> usize {
        assert!(from.0 < self.size() && to.0 < self.size());
        from.0 * self.size() + to.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_job() -> LinkGraphJob {
        LinkGraphJob::new(vec![StationId(10), StationId(20)], JobSettings::default()).unwrap()
    }

    #[test]
    fn rejects_duplicate_stations() {
        let err = LinkGraphJob::new(
            vec![StationId(1), StationId(1)],
            JobSettings::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_bad_settings() {
        let stations = vec![StationId(1)];
        assert!(LinkGraphJob::new(
            stations.clone(),
            JobSettings {
                accuracy: 0,
                max_saturation: None
            }
        )
        .is_err());
        assert!(LinkGraphJob::new(
            stations,
            JobSettings {
                accuracy: 1,
                max_saturation: Some(101)
            }
        )
        .is_err());
    }

    #[test]
    fn rejects_invalid_links_and_demands() {
        let mut job = two_node_job();
        assert!(job.add_link(NodeId(0), NodeId(2), 5, 1).is_err());
        assert!(job.add_link(NodeId(0), NodeId(1), 5, 0).is_err());
        assert!(job.set_demand(NodeId(0), NodeId(0), 3).is_err());
        job.add_link(NodeId(0), NodeId(1), 5, 1).unwrap();
        assert!(job.add_link(NodeId(0), NodeId(1), 5, 1).is_err());
    }

    #[test]
    fn demand_without_link_is_allowed() {
        let mut job = two_node_job();
        job.set_demand(NodeId(0), NodeId(1), 7).unwrap();
        let edge = job.edge(NodeId(0), NodeId(1));
        assert!(!edge.has_link());
        assert_eq!(edge.demand(), 7);
        assert_eq!(edge.unsatisfied_demand(), 7);
    }

    #[test]
    fn flow_shares_keep_insertion_order() {
        let mut stat = FlowStat::default();
        stat.append(StationId(5), 3);
        stat.append(StationId(2), 4);
        stat.append(StationId(9), 1);
        let hops: Vec<StationId> = stat.shares().map(|(_, hop)| hop).collect();
        assert_eq!(hops, vec![StationId(5), StationId(2), StationId(9)]);
        assert_eq!(stat.total(), 8);
    }
}
