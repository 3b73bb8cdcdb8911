use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("node does not exist: {0}")]
    NoNode(String),

    #[error("node already exists: {0}")]
    NodeExists(String),

    #[error("coordination store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("coordination store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_no_node(&self) -> bool {
        matches!(self, StoreError::NoNode(_))
    }

    pub fn is_node_exists(&self) -> bool {
        matches!(self, StoreError::NodeExists(_))
    }
}
