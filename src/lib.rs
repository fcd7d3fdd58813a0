pub mod console;
pub mod cs;
pub mod error;
pub mod logger;

pub use cs::hashing;
pub use cs::hashing::{ChainedTable, ChainedTableBuilder, GrowTrigger};
pub use error::{Error, Result};
