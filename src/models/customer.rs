//! Customer identity record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Remote-assigned customer status.
///
/// The remote system may introduce statuses this client does not know about;
/// those deserialize to `Unknown` so the resolver can report them instead of
/// failing to decode the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Initiated,
    Queued,
    IdentityVerified,
    Active,
    ManualReview,
    UnderReview,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initiated => "initiated",
            Self::Queued => "queued",
            Self::IdentityVerified => "identity_verified",
            Self::Active => "active",
            Self::ManualReview => "manual_review",
            Self::UnderReview => "under_review",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A customer record as returned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub uid: String,
    pub email: String,
    pub status: CustomerStatus,
    /// PII bundle — absent until the customer submits their details.
    #[serde(default)]
    pub details: Option<CustomerDetails>,
}

impl Customer {
    /// Whether the customer has submitted their personal details.
    ///
    /// Mirrors the remote contract: a details record with an empty
    /// `first_name` counts as not yet submitted.
    pub fn has_details(&self) -> bool {
        self.details
            .as_ref()
            .and_then(|d| d.first_name.as_deref())
            .is_some_and(|name| !name.is_empty())
    }
}

/// Submitted PII for a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<Address>,
    /// Digits only, no formatting mask.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub street1: String,
    #[serde(default)]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}
