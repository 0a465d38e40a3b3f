mod budget;
mod categorize;
mod filter;
mod form;
mod ledger;
mod money;
mod seed;
mod transaction;

pub use budget::*;
pub use categorize::*;
pub use filter::*;
pub use form::*;
pub use ledger::*;
pub use money::*;
pub use seed::*;
pub use transaction::*;
