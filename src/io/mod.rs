pub mod export;
pub mod import;
mod record;

pub use export::*;
pub use import::*;
pub use record::*;
