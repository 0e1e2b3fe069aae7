pub mod types;
pub mod uds;
pub mod validate;

pub use types::*;
pub use uds::enrich_description;
pub use validate::{ValidationError, validate_document};
