//! Core module containing the record capability trait and dynamic field values

pub mod field;
pub mod record;

pub use field::FieldValue;
pub use record::{Record, Relation, RelationKind};
