use crate::items::NodeId;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid view config in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no node with id {0}")]
    UnknownNode(NodeId),
    #[error("no arc from {0} to {1}")]
    UnknownArc(NodeId, NodeId),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
