//! Remote compliance API — trait seam plus the HTTP implementation.

pub mod http;
pub mod ip;

pub use http::HttpComplianceClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{ApiList, ComplianceWorkflow, Customer, CustomerDetails, SyntheticAccount};

/// Filter for customer lookups.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerQuery {
    pub email: String,
    /// Include customers still in the `initiated` status.
    pub include_initiated: bool,
}

/// Payload for a document acknowledgement call.
///
/// `ip_address` and `user_name` are audit fields required by the remote
/// service.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAcknowledgement {
    pub accept: String,
    pub document_uid: String,
    pub ip_address: String,
    pub user_name: String,
}

impl DocumentAcknowledgement {
    pub fn accept(document_uid: &str, ip_address: &str, user_name: &str) -> Self {
        Self {
            accept: "yes".to_string(),
            document_uid: document_uid.to_string(),
            ip_address: ip_address.to_string(),
            user_name: user_name.to_string(),
        }
    }
}

/// Capability set consumed from the remote compliance service.
///
/// The resolver and poller depend only on this trait; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait ComplianceApi: Send + Sync {
    /// Create a fresh workflow (and customer) for an email address.
    ///
    /// `idempotency_key` guards against duplicate creation on retry.
    async fn create_workflow(
        &self,
        idempotency_key: &str,
        email: &str,
    ) -> Result<ComplianceWorkflow, ApiError>;

    /// Start a renewal workflow for an existing customer whose previous
    /// workflow expired. Preserves the customer identity, resets the
    /// checklist.
    async fn renew_workflow(
        &self,
        idempotency_key: &str,
        customer_uid: &str,
        email: &str,
    ) -> Result<ComplianceWorkflow, ApiError>;

    /// Fetch a workflow by its uid.
    async fn get_workflow(&self, workflow_uid: &str) -> Result<ComplianceWorkflow, ApiError>;

    /// Fetch the most recent workflow for a customer.
    async fn latest_workflow(&self, customer_uid: &str) -> Result<ComplianceWorkflow, ApiError>;

    /// Acknowledge one document; returns the server's updated workflow
    /// snapshot.
    async fn acknowledge_document(
        &self,
        workflow_uid: &str,
        customer_uid: &str,
        acknowledgement: DocumentAcknowledgement,
    ) -> Result<ComplianceWorkflow, ApiError>;

    /// Fetch a customer by uid.
    async fn get_customer(&self, customer_uid: &str) -> Result<Customer, ApiError>;

    /// Submit or replace a customer's PII bundle; returns the updated record.
    async fn update_customer(
        &self,
        customer_uid: &str,
        details: &CustomerDetails,
    ) -> Result<Customer, ApiError>;

    /// Look up customers matching a query.
    async fn list_customers(&self, query: CustomerQuery) -> Result<ApiList<Customer>, ApiError>;

    /// List the synthetic accounts belonging to a customer.
    async fn list_accounts(
        &self,
        customer_uid: &str,
    ) -> Result<ApiList<SyntheticAccount>, ApiError>;
}
