//! Error types for the onview core.

use thiserror::Error;

use crate::ids::{ElementId, WatcherId};

/// Failures of the document and engine APIs.
///
/// Per-element attribute problems never show up here; those resolve to
/// defaults or to a flagged element.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OnviewError {
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
    #[error("unknown watcher {0:?}")]
    UnknownWatcher(WatcherId),
    #[error("element tree parse error: {0}")]
    TreeParse(String),
}

/// Why a counter could not be started.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CounterError {
    #[error("invalid data-target-number {raw:?}")]
    InvalidTarget { raw: Option<String> },
}

pub type Result<T, E = OnviewError> = std::result::Result<T, E>;
