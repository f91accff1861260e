//! Onboarding: agent registration schema, screens and persistence.
//!
//! A new player registers as an "agent": they pass a splash and a welcome
//! screen, fill in the agent passport form, and accept the data consents.
//! This module holds the declarative side of that flow (record schema,
//! screen descriptors, labels) plus validation and snapshot persistence.
//! Rendering and navigation belong to the host UI.

pub mod labels;
pub mod model;
pub mod persist;
pub mod schema;
pub mod screens;
pub mod validate;

pub use labels::{age_label, gender_label, success_message, AGE_LABELS, GENDER_LABELS};
pub use model::AgentRecord;
pub use persist::{storage_keys, AgentStore};
pub use schema::{
    schema_field, Activity, AgeGroup, Education, FactCheck, FieldType, Gender, Goal, Platform,
    Region, Role, SchemaField, UnknownValue, VisibleWhen, AGENT_SCHEMA,
};
pub use screens::{
    catalog, ConsentScreen, FormField, FormScreen, InputKind, PrivacyPolicy, ScreenId, CONSENT,
    FORM, PRIVACY_POLICY, SPLASH, WELCOME,
};
pub use validate::{validate, validate_value, ValidationResult};
