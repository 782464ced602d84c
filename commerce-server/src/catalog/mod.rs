//! Catalog engine
//!
//! Pure logic over attribute data: value grouping, attribute set
//! inference and variant generation. The repositories feed these
//! functions; nothing here touches the database.

pub mod grouping;
pub mod variants;

pub use grouping::{SetInference, ValueGroup, group_value_ids, infer_set};
pub use variants::{AxisValue, VariantAxis, generate_variants};
