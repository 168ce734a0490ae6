//! # Complimask Core
//!
//! Pure masking decision logic - no file or network I/O.
//!
//! This crate contains:
//! - Policy evaluation and the unmask authorization gate
//! - The mask pattern registry and built-in transforms
//! - The decision engine and the suggestion chain
//! - Decision cache ports and the in-memory store
//!
//! ## Architecture Principles
//! - Only depends on `complimask-common` and `complimask-domain`
//! - External suggestion sources and cache backends via traits
//! - Policy and pattern state is constructed explicitly and passed in

pub mod cache;
pub mod detection;
pub mod engine;
pub mod patterns;
pub mod policy;
pub mod service;
pub mod suggestion;

pub use cache::{CacheSweeper, DecisionKeyer, DecisionStore, ResultCache};
pub use detection::{DataTypeDetector, DataTypeRule};
pub use engine::{CustomRule, DecisionEngine};
pub use patterns::{MaskPattern, PatternContext, PatternRegistry};
pub use policy::{authorize_unmask, cap_by_risk, PolicyStore};
pub use service::MaskingService;
pub use suggestion::{StaticRuleProvider, Suggestion, SuggestionChain, SuggestionProvider};
