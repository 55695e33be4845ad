//! Custom request extractors.

mod query;
mod validated_json;

pub use query::QueryInput;
pub use validated_json::{JsonInput, ValidatedJson};
