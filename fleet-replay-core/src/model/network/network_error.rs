use super::NodeId;

#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("failure reading {path}: {message}")]
    ReadError { path: String, message: String },
    #[error("edge {0}_{1} has invalid weight {2}")]
    InvalidWeight(NodeId, NodeId, f64),
}
