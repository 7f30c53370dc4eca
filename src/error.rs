//! The error raised by suppressed methods.

use thiserror::Error;

/// A method removed with `remove_method!` was called.
///
/// Suppressed methods keep their signatures, so the error is raised as a
/// panic whose message is this error's `Display` output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("undefined method '{name}' for {scope}.")]
pub struct NoMethodError {
    /// Method name as declared.
    pub name: String,
    /// Fully qualified name of the receiver type.
    pub scope: String,
}

impl NoMethodError {
    pub fn new(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Recover the error from a panic payload produced by a suppressed method.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Option<Self> {
        let message = payload
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| payload.downcast_ref::<&str>().copied())?;
        let rest = message.strip_prefix("undefined method '")?;
        let (name, rest) = rest.split_once("' for ")?;
        let scope = rest.strip_suffix('.')?;
        Some(Self::new(name, scope))
    }
}
