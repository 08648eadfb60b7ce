//! Error types for the onboarding core.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Remote compliance API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("{endpoint} returned {status}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("No {entity} found for {query}")]
    NotFound { entity: String, query: String },

    #[error("Could not determine device IP address: {0}")]
    IpLookup(String),
}

/// Client-side form validation errors, keyed by field for inline display.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", summary(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

/// One invalid field with its display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

fn summary(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Step-resolution errors, including reported anomalies that would otherwise
/// be silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("Customer {customer_uid} has unmapped status {status}")]
    UnmappedStatus { customer_uid: String, status: String },

    #[error("Workflow {workflow_uid} is at unmapped step {step}")]
    UnmappedStep { workflow_uid: String, step: u32 },

    #[error(
        "Document {external_storage_name} is neither pending nor accepted in workflow {workflow_uid}"
    )]
    DocumentNotPresent {
        workflow_uid: String,
        external_storage_name: String,
    },
}

/// Session-state errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Workflow {workflow_uid} belongs to customer {workflow_customer_uid}, not {customer_uid}")]
    CustomerMismatch {
        workflow_uid: String,
        workflow_customer_uid: String,
        customer_uid: String,
    },

    #[error("No customer in session")]
    NoCustomer,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
