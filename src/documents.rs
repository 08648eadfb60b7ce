//! Document acknowledgement — the side-effecting half of a disclosure step.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{ComplianceApi, DocumentAcknowledgement};
use crate::error::{ResolverError, Result};
use crate::models::ComplianceWorkflow;

/// Acknowledge one document by its storage identifier.
///
/// If the document is still pending, the remote acknowledgement call is made
/// and the server's updated workflow snapshot is returned — the local one is
/// never mutated. If it is already accepted the call is an idempotent no-op
/// with zero network effects. A document in neither set is an error.
///
/// `ip_address` and `acting_email` are recorded by the remote service as
/// audit fields.
pub async fn acknowledge_document(
    api: &Arc<dyn ComplianceApi>,
    workflow: &ComplianceWorkflow,
    external_storage_name: &str,
    ip_address: &str,
    acting_email: &str,
) -> Result<ComplianceWorkflow> {
    if let Some(document) = workflow.pending_document(external_storage_name) {
        let updated = api
            .acknowledge_document(
                &workflow.uid,
                &workflow.customer.uid,
                DocumentAcknowledgement::accept(&document.uid, ip_address, acting_email),
            )
            .await?;
        info!(
            workflow_uid = %workflow.uid,
            document = external_storage_name,
            "Acknowledged compliance document"
        );
        return Ok(updated);
    }

    if workflow.has_accepted(external_storage_name) {
        debug!(
            workflow_uid = %workflow.uid,
            document = external_storage_name,
            "Document already accepted; nothing to do"
        );
        return Ok(workflow.clone());
    }

    Err(ResolverError::DocumentNotPresent {
        workflow_uid: workflow.uid.clone(),
        external_storage_name: external_storage_name.to_string(),
    }
    .into())
}

/// Acknowledge every document pending for the workflow's current step.
///
/// Used by the disclosures step, which presents the whole pending set at
/// once. Only the documents pending at call time are acknowledged; once the
/// step's checklist clears, the server advances the step and repopulates the
/// pending set with the next step's documents, which are not this call's to
/// accept.
pub async fn acknowledge_all_pending(
    api: &Arc<dyn ComplianceApi>,
    workflow: &ComplianceWorkflow,
    ip_address: &str,
    acting_email: &str,
) -> Result<ComplianceWorkflow> {
    let presented = workflow.current_step_documents_pending.clone();
    let mut current = workflow.clone();

    for document in presented {
        // May have been accepted from another session since the snapshot.
        if current
            .pending_document(&document.external_storage_name)
            .is_none()
        {
            continue;
        }
        current = api
            .acknowledge_document(
                &current.uid,
                &current.customer.uid,
                DocumentAcknowledgement::accept(&document.uid, ip_address, acting_email),
            )
            .await?;
        info!(
            workflow_uid = %current.uid,
            document = %document.external_storage_name,
            "Acknowledged compliance document"
        );
    }
    Ok(current)
}
