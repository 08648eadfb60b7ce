//! Session state — the customer, workflow, and account caches shared across
//! screens, passed explicitly so the resolver stays a function of its inputs.

use std::sync::Arc;

use crate::api::ComplianceApi;
use crate::error::{Result, SessionError};
use crate::models::{ComplianceWorkflow, Customer, SyntheticAccount};

/// Cached remote records for one onboarding session.
///
/// Records are fetched fresh from the remote service on navigation events;
/// the only local writes are whole-snapshot replacements from server
/// responses.
#[derive(Debug, Default)]
pub struct OnboardingSession {
    customer: Option<Customer>,
    workflow: Option<ComplianceWorkflow>,
    accounts: Vec<SyntheticAccount>,
}

impl OnboardingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn workflow(&self) -> Option<&ComplianceWorkflow> {
        self.workflow.as_ref()
    }

    pub fn accounts(&self) -> &[SyntheticAccount] {
        &self.accounts
    }

    /// Accounts flagged as fully provisioned by the banking backend.
    pub fn liability_accounts(&self) -> impl Iterator<Item = &SyntheticAccount> {
        self.accounts.iter().filter(|a| a.is_ready())
    }

    pub fn set_customer(&mut self, customer: Customer) {
        // A new customer invalidates a cached workflow for someone else.
        if self
            .workflow
            .as_ref()
            .is_some_and(|wf| wf.customer.uid != customer.uid)
        {
            self.workflow = None;
        }
        self.customer = Some(customer);
    }

    /// Cache a workflow snapshot.
    ///
    /// Enforces the cross-record invariant: the workflow must belong to the
    /// session's customer when one is cached.
    pub fn set_workflow(&mut self, workflow: ComplianceWorkflow) -> Result<()> {
        if let Some(customer) = &self.customer {
            if workflow.customer.uid != customer.uid {
                return Err(SessionError::CustomerMismatch {
                    workflow_uid: workflow.uid,
                    workflow_customer_uid: workflow.customer.uid,
                    customer_uid: customer.uid.clone(),
                }
                .into());
            }
        }
        self.workflow = Some(workflow);
        Ok(())
    }

    /// Refetch the cached customer from the remote service.
    ///
    /// The PII screen calls this on every navigation-focus event so the form
    /// reflects details submitted in an earlier session.
    pub async fn refresh_customer(&mut self, api: &Arc<dyn ComplianceApi>) -> Result<&Customer> {
        let uid = self
            .customer
            .as_ref()
            .map(|c| c.uid.clone())
            .ok_or(SessionError::NoCustomer)?;
        let customer = api.get_customer(&uid).await?;
        Ok(self.customer.insert(customer))
    }

    /// Refetch the account list for the cached customer.
    pub async fn refresh_accounts(
        &mut self,
        api: &Arc<dyn ComplianceApi>,
    ) -> Result<&[SyntheticAccount]> {
        let uid = self
            .customer
            .as_ref()
            .map(|c| c.uid.clone())
            .ok_or(SessionError::NoCustomer)?;
        let accounts = api.list_accounts(&uid).await?;
        self.accounts = accounts.data;
        Ok(&self.accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::workflow::{WorkflowCustomer, WorkflowStatus, WorkflowSummary};
    use crate::models::CustomerStatus;

    fn customer(uid: &str) -> Customer {
        Customer {
            uid: uid.to_string(),
            email: "a@x.com".to_string(),
            status: CustomerStatus::Initiated,
            details: None,
        }
    }

    fn workflow(customer_uid: &str) -> ComplianceWorkflow {
        ComplianceWorkflow {
            uid: "wf-1".to_string(),
            customer: WorkflowCustomer {
                uid: customer_uid.to_string(),
                email: "a@x.com".to_string(),
            },
            summary: WorkflowSummary {
                status: WorkflowStatus::Active,
                current_step: 1,
            },
            current_step_documents_pending: Vec::new(),
            accepted_documents: Vec::new(),
        }
    }

    #[test]
    fn workflow_must_match_customer() {
        let mut session = OnboardingSession::new();
        session.set_customer(customer("cust-1"));

        assert!(session.set_workflow(workflow("cust-1")).is_ok());

        let err = session.set_workflow(workflow("cust-2")).unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::CustomerMismatch { .. })
        ));
    }

    #[test]
    fn replacing_customer_drops_foreign_workflow() {
        let mut session = OnboardingSession::new();
        session.set_customer(customer("cust-1"));
        session.set_workflow(workflow("cust-1")).unwrap();

        session.set_customer(customer("cust-2"));
        assert!(session.workflow().is_none());

        // Same customer keeps the cached workflow.
        let mut session = OnboardingSession::new();
        session.set_customer(customer("cust-1"));
        session.set_workflow(workflow("cust-1")).unwrap();
        session.set_customer(customer("cust-1"));
        assert!(session.workflow().is_some());
    }

    #[test]
    fn workflow_allowed_without_customer() {
        let mut session = OnboardingSession::new();
        assert!(session.set_workflow(workflow("cust-1")).is_ok());
    }
}
