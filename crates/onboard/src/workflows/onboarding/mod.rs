//! Event-driven onboarding pipeline: an HTTP front door feeds a synchronous
//! step engine that walks each candidate from offer mail to joining letter.
//! The record store is authoritative; ledger and mail are best-effort
//! mirrors of it.

pub mod credentials;
pub mod documents;
pub mod domain;
pub mod engine;
pub mod events;
pub mod fulfillment;
pub mod ledger;
pub mod messages;
pub mod notify;
pub mod router;
pub mod service;
pub mod state;
pub mod steps;
pub mod store;
pub mod verifier;

pub use router::onboarding_router;
pub use service::{OnboardingService, ServiceError};
pub use steps::{standard_steps, Collaborators};
