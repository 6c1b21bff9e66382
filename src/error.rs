use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("element `{0}` not found")]
    MissingElement(String),
    #[error("no project at index {index} (catalog holds {len})")]
    NoSuchProject { index: usize, len: usize },
    #[error("no project with id {0}")]
    UnknownProjectId(u32),
    #[error("modal is closed")]
    ModalClosed,
    #[error("dom operation failed: {0}")]
    Dom(String),
}

impl UiError {
    pub fn missing(what: impl Into<String>) -> Self {
        UiError::MissingElement(what.into())
    }
}

/// Logs a failed operation without propagating it further.
pub fn report<T>(context: &str, result: Result<T, UiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{}: {}", context, e);
            None
        }
    }
}
