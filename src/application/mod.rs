// Application layer - use cases on top of the session ledger.
// Front ends (the CLI today) talk to LedgerService rather than to the
// ledger directly, so validation and not-found reporting live in one place.

pub mod analytics;
pub mod error;
pub mod reporting;
pub mod service;

pub use analytics::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
