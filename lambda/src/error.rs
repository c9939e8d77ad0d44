use thiserror::Error;

use crate::term::Identifier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Renaming the binder to `{0}` would capture its free occurrence in the body")]
    Capture(Identifier),
    #[error("Expected an abstraction, found `{0}`")]
    NotAnAbstraction(String),
}
pub type Result<T> = std::result::Result<T, EngineError>;
