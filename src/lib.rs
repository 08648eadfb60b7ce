//! KYC onboarding core — compliance-workflow step resolution for an
//! account-opening flow backed by a remote compliance service.

pub mod api;
pub mod config;
pub mod documents;
pub mod error;
pub mod models;
pub mod poller;
pub mod resolver;
pub mod session;
pub mod validation;
