//! Onboarding step resolver.
//!
//! Given a customer's status and the state of their compliance workflow,
//! decides which screen the user should be routed to next and performs the
//! side-effecting transition (workflow creation or renewal) needed to get
//! there. The status and step mappings are pure functions; only
//! [`StepResolver`] touches the network.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api::{ComplianceApi, CustomerQuery};
use crate::error::{ResolverError, Result};
use crate::models::workflow::PATRIOT_ACT_NOTICE;
use crate::models::{ComplianceWorkflow, Customer, CustomerStatus};
use crate::session::OnboardingSession;
use crate::validation;

/// Where the presentation layer should take the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    Disclosures,
    PatriotAct,
    Pii,
    BankingDisclosures,
    /// Terminal display state while the remote system decides.
    ProcessingApplication,
    /// Onboarding complete.
    Home,
    ApplicationUnapproved(CustomerStatus),
}

impl std::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disclosures => write!(f, "disclosures"),
            Self::PatriotAct => write!(f, "patriot_act"),
            Self::Pii => write!(f, "pii"),
            Self::BankingDisclosures => write!(f, "banking_disclosures"),
            Self::ProcessingApplication => write!(f, "processing_application"),
            Self::Home => write!(f, "home"),
            Self::ApplicationUnapproved(status) => {
                write!(f, "application_unapproved({status})")
            }
        }
    }
}

/// First-level dispatch on customer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `initiated` — the workflow must be inspected to pick a step.
    ResumeWorkflow,
    /// Status maps directly to a target.
    Target(NavigationTarget),
    /// Status this client does not know how to route.
    Unmapped,
}

/// Map a customer status to its route.
///
/// Total over the status enum: every status yields exactly one route, with
/// unmapped remote statuses reported rather than silently dropped.
pub fn route_for_status(status: CustomerStatus) -> StatusRoute {
    use CustomerStatus::*;
    match status {
        Initiated => StatusRoute::ResumeWorkflow,
        Queued | IdentityVerified => StatusRoute::Target(NavigationTarget::ProcessingApplication),
        Active => StatusRoute::Target(NavigationTarget::Home),
        ManualReview | UnderReview | Rejected => {
            StatusRoute::Target(NavigationTarget::ApplicationUnapproved(status))
        }
        Unknown => StatusRoute::Unmapped,
    }
}

/// Route an in-progress workflow by its current step.
///
/// Step 1 is the general disclosures. Step 2 requires the Patriot Act notice
/// to be acknowledged first, then PII entry, then banking disclosures.
pub fn step_target(
    workflow: &ComplianceWorkflow,
    customer: &Customer,
) -> std::result::Result<NavigationTarget, ResolverError> {
    match workflow.summary.current_step {
        1 => Ok(NavigationTarget::Disclosures),
        2 => {
            if !workflow.has_accepted(PATRIOT_ACT_NOTICE) {
                Ok(NavigationTarget::PatriotAct)
            } else if !customer.has_details() {
                Ok(NavigationTarget::Pii)
            } else {
                Ok(NavigationTarget::BankingDisclosures)
            }
        }
        step => Err(ResolverError::UnmappedStep {
            workflow_uid: workflow.uid.clone(),
            step,
        }),
    }
}

/// Client-generated idempotency token for workflow creation and renewal.
fn idempotency_token() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Executes the onboarding decision procedure against the remote service.
pub struct StepResolver {
    api: Arc<dyn ComplianceApi>,
}

impl StepResolver {
    pub fn new(api: Arc<dyn ComplianceApi>) -> Self {
        Self { api }
    }

    /// Full submit flow: look the email up, then create, renew, or resume a
    /// workflow as the customer's state requires.
    ///
    /// The email is validated before any network call. Session caches are
    /// updated with every record fetched along the way.
    pub async fn submit_email(
        &self,
        email: &str,
        session: &mut OnboardingSession,
    ) -> Result<NavigationTarget> {
        validation::validate_email(email)?;

        let existing = self
            .api
            .list_customers(CustomerQuery {
                email: email.to_string(),
                include_initiated: true,
            })
            .await?;

        if existing.is_empty() {
            return self.start_new_workflow(email, session).await;
        }
        let Some(customer) = existing.data.into_iter().next() else {
            return self.start_new_workflow(email, session).await;
        };

        session.set_customer(customer.clone());

        match route_for_status(customer.status) {
            StatusRoute::Target(target) => {
                info!(customer_uid = %customer.uid, status = %customer.status, %target, "Routed by status");
                Ok(target)
            }
            StatusRoute::ResumeWorkflow => self.resume_workflow(&customer, session).await,
            StatusRoute::Unmapped => {
                warn!(
                    customer_uid = %customer.uid,
                    status = %customer.status,
                    "Customer is in a status this client cannot route"
                );
                Err(ResolverError::UnmappedStatus {
                    customer_uid: customer.uid.clone(),
                    status: customer.status.to_string(),
                }
                .into())
            }
        }
    }

    /// Create a brand-new workflow for an email with no customer record.
    async fn start_new_workflow(
        &self,
        email: &str,
        session: &mut OnboardingSession,
    ) -> Result<NavigationTarget> {
        let workflow = self
            .api
            .create_workflow(&idempotency_token(), email)
            .await?;
        let customer = self.api.get_customer(&workflow.customer.uid).await?;

        info!(customer_uid = %customer.uid, workflow_uid = %workflow.uid, "Created compliance workflow");

        session.set_customer(customer);
        session.set_workflow(workflow)?;
        Ok(NavigationTarget::Disclosures)
    }

    /// Resume an `initiated` customer: renew an expired workflow or route to
    /// the current step of the active one.
    async fn resume_workflow(
        &self,
        customer: &Customer,
        session: &mut OnboardingSession,
    ) -> Result<NavigationTarget> {
        let latest = self.api.latest_workflow(&customer.uid).await?;

        if latest.is_expired() {
            let renewed = self
                .api
                .renew_workflow(
                    &idempotency_token(),
                    &latest.customer.uid,
                    &latest.customer.email,
                )
                .await?;
            let refreshed = self.api.get_customer(&renewed.customer.uid).await?;

            info!(
                customer_uid = %refreshed.uid,
                workflow_uid = %renewed.uid,
                "Renewed expired compliance workflow"
            );

            session.set_customer(refreshed);
            session.set_workflow(renewed)?;
            return Ok(NavigationTarget::Disclosures);
        }

        let target = step_target(&latest, customer)?;
        info!(
            customer_uid = %customer.uid,
            workflow_uid = %latest.uid,
            step = latest.summary.current_step,
            %target,
            "Resumed compliance workflow"
        );
        session.set_workflow(latest)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workflow::{Document, WorkflowCustomer, WorkflowStatus, WorkflowSummary};
    use crate::models::CustomerDetails;

    const ALL_STATUSES: [CustomerStatus; 8] = [
        CustomerStatus::Initiated,
        CustomerStatus::Queued,
        CustomerStatus::IdentityVerified,
        CustomerStatus::Active,
        CustomerStatus::ManualReview,
        CustomerStatus::UnderReview,
        CustomerStatus::Rejected,
        CustomerStatus::Unknown,
    ];

    fn customer(status: CustomerStatus, first_name: Option<&str>) -> Customer {
        Customer {
            uid: "cust-1".to_string(),
            email: "a@x.com".to_string(),
            status,
            details: first_name.map(|name| CustomerDetails {
                first_name: Some(name.to_string()),
                ..Default::default()
            }),
        }
    }

    fn workflow(step: u32, accepted: &[&str]) -> ComplianceWorkflow {
        ComplianceWorkflow {
            uid: "wf-1".to_string(),
            customer: WorkflowCustomer {
                uid: "cust-1".to_string(),
                email: "a@x.com".to_string(),
            },
            summary: WorkflowSummary {
                status: WorkflowStatus::Active,
                current_step: step,
            },
            current_step_documents_pending: Vec::new(),
            accepted_documents: accepted
                .iter()
                .map(|name| Document {
                    uid: format!("doc-{name}"),
                    external_storage_name: name.to_string(),
                    name: None,
                })
                .collect(),
        }
    }

    #[test]
    fn status_routing_is_total() {
        for status in ALL_STATUSES {
            // Every status maps to exactly one route; the match in
            // route_for_status has no wildcard arm, so a new variant breaks
            // compilation rather than falling through.
            let route = route_for_status(status);
            match status {
                CustomerStatus::Initiated => assert_eq!(route, StatusRoute::ResumeWorkflow),
                CustomerStatus::Unknown => assert_eq!(route, StatusRoute::Unmapped),
                _ => assert!(matches!(route, StatusRoute::Target(_))),
            }
        }
    }

    #[test]
    fn review_statuses_carry_their_status() {
        assert_eq!(
            route_for_status(CustomerStatus::ManualReview),
            StatusRoute::Target(NavigationTarget::ApplicationUnapproved(
                CustomerStatus::ManualReview
            ))
        );
        assert_eq!(
            route_for_status(CustomerStatus::Rejected),
            StatusRoute::Target(NavigationTarget::ApplicationUnapproved(
                CustomerStatus::Rejected
            ))
        );
    }

    #[test]
    fn processing_statuses_route_to_processing() {
        for status in [CustomerStatus::Queued, CustomerStatus::IdentityVerified] {
            assert_eq!(
                route_for_status(status),
                StatusRoute::Target(NavigationTarget::ProcessingApplication)
            );
        }
    }

    #[test]
    fn step_one_routes_to_disclosures() {
        let target = step_target(&workflow(1, &[]), &customer(CustomerStatus::Initiated, None));
        assert_eq!(target.unwrap(), NavigationTarget::Disclosures);
    }

    #[test]
    fn step_two_without_patriot_act_routes_to_patriot_act() {
        let target = step_target(
            &workflow(2, &["usa_cons_0"]),
            &customer(CustomerStatus::Initiated, Some("Jane")),
        );
        assert_eq!(target.unwrap(), NavigationTarget::PatriotAct);
    }

    #[test]
    fn step_two_with_patriot_act_depends_on_details() {
        let wf = workflow(2, &[PATRIOT_ACT_NOTICE]);

        let target = step_target(&wf, &customer(CustomerStatus::Initiated, None));
        assert_eq!(target.unwrap(), NavigationTarget::Pii);

        let target = step_target(&wf, &customer(CustomerStatus::Initiated, Some("Jane")));
        assert_eq!(target.unwrap(), NavigationTarget::BankingDisclosures);
    }

    #[test]
    fn unmapped_step_is_reported() {
        let err = step_target(&workflow(3, &[]), &customer(CustomerStatus::Initiated, None))
            .unwrap_err();
        assert_eq!(
            err,
            ResolverError::UnmappedStep {
                workflow_uid: "wf-1".to_string(),
                step: 3
            }
        );
    }

    #[test]
    fn idempotency_tokens_are_numeric_millis() {
        let token = idempotency_token();
        assert!(token.parse::<i64>().is_ok());
    }
}
