pub mod block;
pub mod builders;
pub mod key;
pub mod operators;
pub mod values;

pub use self::block::BuildingBlock;
pub use self::key::{Key, KeyPath};
pub use self::operators::{Conjunction, Predicate};
pub use self::values::Value;
