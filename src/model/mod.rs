pub mod config;
pub mod filter;
pub mod priority;
pub mod project;
pub mod task;
pub mod user;

pub use config::*;
pub use filter::*;
pub use priority::*;
pub use project::*;
pub use task::*;
pub use user::*;

/// A string did not name any variant of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?} (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        ParseEnumError {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// A create/update payload failed basic form validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}
