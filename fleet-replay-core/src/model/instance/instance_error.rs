#[derive(thiserror::Error, Debug)]
pub enum InstanceError {
    #[error("failure reading problem instance {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("problem instance line {line}: {message}")]
    ParseError { line: usize, message: String },
}
