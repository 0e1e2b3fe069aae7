use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure: the input cannot be turned into an element tree.
#[derive(Debug, Error)]
pub enum CddParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(String),
    #[error("closing tag without a matching opening tag")]
    UnbalancedEnd,
    #[error("second root element <{0}>")]
    MultipleRoots(String),
    #[error("document has no root element")]
    EmptyDocument,
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An attribute or text value that cannot be unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {what} of <{element}>: {message}")]
pub struct NodeError {
    pub element: String,
    pub what: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Service,
    Message,
    Component,
    Did,
    DataObject,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Service => "service",
            Self::Message => "message",
            Self::Component => "component",
            Self::Did => "DID",
            Self::DataObject => "data object",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Undecodable(#[from] NodeError),
    #[error("attribute '{attribute}' is not a valid number: '{value}'")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
}

/// A single entity that was present in the source but could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped {entity} '{id}': {reason}")]
pub struct Skipped {
    pub entity: EntityKind,
    pub id: String,
    #[source]
    pub reason: SkipReason,
}

/// Collects skipped entities during one parse pass.
#[derive(Debug, Default)]
pub struct SkipLog {
    entries: Vec<Skipped>,
}

impl SkipLog {
    pub fn record(&mut self, skipped: Skipped) {
        log::warn!("{skipped}");
        self.entries.push(skipped);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> Vec<Skipped> {
        self.entries
    }
}
