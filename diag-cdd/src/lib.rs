pub mod did_extractor;
pub mod error;
pub mod locator;
pub mod metadata;
pub mod parser;
pub mod service_extractor;
pub mod tree;

pub use error::{CddParseError, EntityKind, NodeError, SkipReason, Skipped};
pub use parser::{CddParser, ParseReport, parse_cdd, parse_cdd_file};
pub use tree::{Element, XmlNode};
