// Application layer: the ledger service and the views derived from it.
// Input validation belongs to the caller; the ledger trusts what it is given.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
