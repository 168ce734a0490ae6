//! Policy evaluation: the role x data-type matrix, risk capping and the
//! unmask authorization gate.

pub mod authorization;
pub mod store;

pub use authorization::authorize_unmask;
pub use store::{cap_by_risk, PolicyStore};
