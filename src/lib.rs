//! Agent onboarding: registration flow data, validation and persistence.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
