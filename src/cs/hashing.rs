pub mod chained;
pub mod polynomial;

pub use chained::{ChainedTable, ChainedTableBuilder, GrowTrigger, MIN_CAPACITY};
pub use polynomial::{hash_key, PolynomialKeyHash};
