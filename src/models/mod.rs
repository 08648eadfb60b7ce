//! Typed models for the remote compliance service.

pub mod account;
pub mod customer;
pub mod workflow;

pub use account::SyntheticAccount;
pub use customer::{Address, Customer, CustomerDetails, CustomerStatus};
pub use workflow::{
    ComplianceWorkflow, Document, WorkflowCustomer, WorkflowStatus, WorkflowSummary,
};

use serde::{Deserialize, Serialize};

/// Generic list envelope returned by the remote service's list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiList<T> {
    pub count: u64,
    pub data: Vec<T>,
}

impl<T> ApiList<T> {
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.data.is_empty()
    }
}
