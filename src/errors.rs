use thiserror::Error;

use crate::planner::Stage;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("{0}")] Validation(String),
    #[error("schema error: {0}")] Schema(String),
    #[error("{message}")] Stage { step: Stage, message: String },
}

impl PlannerError {
    /// Stage the failure is tagged with, if it came out of a planning call.
    pub fn step(&self) -> Option<Stage> {
        match self {
            PlannerError::Stage { step, .. } => Some(*step),
            _ => None,
        }
    }
}
