pub mod field;
pub mod pointer;

pub use field::{Field, FieldPair};
pub use pointer::{PointerState, PointerTracker};
