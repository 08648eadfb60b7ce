//! HTTP implementation of [`ComplianceApi`] over reqwest.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::api::{ComplianceApi, CustomerQuery, DocumentAcknowledgement};
use crate::config::OnboardConfig;
use crate::error::ApiError;
use crate::models::{ApiList, ComplianceWorkflow, Customer, CustomerDetails, SyntheticAccount};

/// Client for the remote compliance service's REST API.
pub struct HttpComplianceClient {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl HttpComplianceClient {
    pub fn new(config: &OnboardConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::RequestFailed {
                endpoint: "client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self
            .client
            .get(self.api_url(path))
            .bearer_auth(&self.api_token);
        Self::execute(path, request).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let request = self
            .client
            .post(self.api_url(path))
            .bearer_auth(&self.api_token)
            .json(body);
        Self::execute(path, request).await
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let request = self
            .client
            .put(self.api_url(path))
            .bearer_auth(&self.api_token)
            .json(body);
        Self::execute(path, request).await
    }

    async fn execute<T: DeserializeOwned>(
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ComplianceApi for HttpComplianceClient {
    async fn create_workflow(
        &self,
        idempotency_key: &str,
        email: &str,
    ) -> Result<ComplianceWorkflow, ApiError> {
        let body = serde_json::json!({
            "external_uid": idempotency_key,
            "email": email,
        });
        self.post_json("compliance_workflows", &body).await
    }

    async fn renew_workflow(
        &self,
        idempotency_key: &str,
        customer_uid: &str,
        email: &str,
    ) -> Result<ComplianceWorkflow, ApiError> {
        let body = serde_json::json!({
            "external_uid": idempotency_key,
            "customer_uid": customer_uid,
            "email": email,
        });
        self.post_json("compliance_workflows/renew", &body).await
    }

    async fn get_workflow(&self, workflow_uid: &str) -> Result<ComplianceWorkflow, ApiError> {
        self.get_json(&format!("compliance_workflows/{workflow_uid}"))
            .await
    }

    async fn latest_workflow(&self, customer_uid: &str) -> Result<ComplianceWorkflow, ApiError> {
        self.get_json(&format!("compliance_workflows/latest/{customer_uid}"))
            .await
    }

    async fn acknowledge_document(
        &self,
        workflow_uid: &str,
        customer_uid: &str,
        acknowledgement: DocumentAcknowledgement,
    ) -> Result<ComplianceWorkflow, ApiError> {
        let body = serde_json::json!({
            "customer_uid": customer_uid,
            "documents": [acknowledgement],
        });
        self.put_json(
            &format!("compliance_workflows/{workflow_uid}/acknowledge_document"),
            &body,
        )
        .await
    }

    async fn get_customer(&self, customer_uid: &str) -> Result<Customer, ApiError> {
        self.get_json(&format!("customers/{customer_uid}")).await
    }

    async fn update_customer(
        &self,
        customer_uid: &str,
        details: &CustomerDetails,
    ) -> Result<Customer, ApiError> {
        let body = serde_json::json!({ "details": details });
        self.put_json(&format!("customers/{customer_uid}"), &body)
            .await
    }

    async fn list_customers(&self, query: CustomerQuery) -> Result<ApiList<Customer>, ApiError> {
        let path = format!(
            "customers?email={}&include_initiated={}",
            urlencode(&query.email),
            query.include_initiated,
        );
        self.get_json(&path).await
    }

    async fn list_accounts(
        &self,
        customer_uid: &str,
    ) -> Result<ApiList<SyntheticAccount>, ApiError> {
        self.get_json(&format!("synthetic_accounts?customer_uid={customer_uid}"))
            .await
    }
}

/// Percent-encode the handful of characters that can appear in an email
/// address and are unsafe in a query string.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'@' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
