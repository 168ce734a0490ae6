//! Domain types and models

pub mod health;
pub mod masking;
pub mod policy;
pub mod requests;

pub use health::{HealthReport, HealthStatus, InfoReport, PatternInfo, ProviderHealth};
pub use masking::{DecideResult, DecisionSource, MaskLevel, RiskLevel};
pub use policy::PolicyDocument;
pub use requests::{MaskRequest, MaskResponse, UnmaskDecision, UnmaskRequest};
