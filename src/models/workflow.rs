//! Compliance workflow — the remote checklist of disclosures a customer must
//! acknowledge before account activation.

use serde::{Deserialize, Serialize};

/// Stable identifier of the USA Patriot Act notice document.
pub const PATRIOT_ACT_NOTICE: &str = "usa_ptrt_0";

/// Remote-assigned workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Active,
    Expired,
    #[serde(other)]
    Unknown,
}

/// Progress summary for a workflow.
///
/// Step 1 is the general disclosures, step 2 the identity documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub status: WorkflowStatus,
    pub current_step: u32,
}

/// The customer a workflow belongs to, as embedded in workflow payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowCustomer {
    pub uid: String,
    pub email: String,
}

/// A disclosure document within a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub uid: String,
    /// Stable storage identifier, e.g. `usa_ptrt_0`.
    pub external_storage_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A versioned compliance checklist tied to one customer.
///
/// A document is never in both the pending and accepted sets at once; the
/// workflow is complete for its current step only when every required
/// document has moved to `accepted_documents`. Snapshots are replaced
/// wholesale by server responses, never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceWorkflow {
    pub uid: String,
    pub customer: WorkflowCustomer,
    pub summary: WorkflowSummary,
    #[serde(default)]
    pub current_step_documents_pending: Vec<Document>,
    #[serde(default)]
    pub accepted_documents: Vec<Document>,
}

impl ComplianceWorkflow {
    /// Find a pending document by its storage identifier.
    pub fn pending_document(&self, external_storage_name: &str) -> Option<&Document> {
        self.current_step_documents_pending
            .iter()
            .find(|d| d.external_storage_name == external_storage_name)
    }

    /// Whether a document has already been accepted.
    pub fn has_accepted(&self, external_storage_name: &str) -> bool {
        self.accepted_documents
            .iter()
            .any(|d| d.external_storage_name == external_storage_name)
    }

    pub fn is_expired(&self) -> bool {
        self.summary.status == WorkflowStatus::Expired
    }
}
