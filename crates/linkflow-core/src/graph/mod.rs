use std::fmt;

pub mod job;

pub use job::{EdgeData, FlowStat, JobSettings, LinkGraphJob, DISTANCE_MAX, NO_LINK, QUANTITY_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

#[derive(Debug, Clone)]
pub enum JobError {
    InvalidInput(String),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::InvalidInput(message) => write!(f, "{message}"),
        }
    }
}
