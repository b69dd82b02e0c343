use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewswireError {
    #[error("unknown row state '{0}'")]
    InvalidState(String),
}
