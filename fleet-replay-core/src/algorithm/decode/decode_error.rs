#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("line is missing its {0} field")]
    MissingField(&'static str),
    #[error("field {field} has invalid value '{value}': {message}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        message: String,
    },
    #[error("unknown tag '{0}'")]
    UnknownTag(String),
    #[error("signed entry {0} of {1} cannot be zero")]
    ZeroSignedEntry(usize, &'static str),
    #[error("signed entry {0} of {1} does not fit a 64-bit id")]
    SignedEntryOutOfRange(usize, &'static str),
    #[error("tag {tag} expects {expected} payload fields, found {found}")]
    UnexpectedFieldCount {
        tag: char,
        expected: usize,
        found: usize,
    },
}
