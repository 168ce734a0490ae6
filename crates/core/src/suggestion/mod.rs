//! Best-effort external suggestions for a mask level.

pub mod chain;
pub mod ports;
pub mod static_rules;

pub use chain::SuggestionChain;
pub use ports::{Suggestion, SuggestionProvider};
pub use static_rules::StaticRuleProvider;
