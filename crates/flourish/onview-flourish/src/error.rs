use onview_core::{ElementId, OnviewError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlourishError {
    #[error("{element:?} has no descendant with class {class:?}")]
    MissingPart {
        element: ElementId,
        class: &'static str,
    },
    #[error("slider {0:?} has no slides")]
    NoSlides(ElementId),
    #[error("no tab button and panel pair for {0:?}")]
    UnknownTab(String),
    #[error(transparent)]
    Core(#[from] OnviewError),
}
