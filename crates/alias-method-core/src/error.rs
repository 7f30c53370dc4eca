//! Error types for directive parsing and expansion.
//!
//! A reference that resolves to nothing is never an error: it is reported as
//! `None` by the generator entry points. The types here cover misuse only,
//! such as a malformed reference string or a directive in a trait impl.

use proc_macro2::TokenStream;
use thiserror::Error;

/// Problems with the text of a `[scope.]name` method reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("method reference is empty")]
    Empty,

    #[error("method reference `{reference}` has no method name after `.`")]
    MissingName { reference: String },

    #[error("`{name}` is not a valid method name")]
    InvalidName { name: String },

    #[error("`{segment}` is not a valid path segment in `{reference}`")]
    InvalidSegment { segment: String, reference: String },

    #[error("method reference `{reference}` has an empty path segment")]
    EmptySegment { reference: String },
}

/// Main error type for an expansion pass.
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("{0}")]
    Directive(#[from] syn::Error),

    #[error("`#[method_aliases]` only applies to inherent impl blocks and inline modules")]
    UnsupportedItem,

    #[error("invalid hidden name prefix `{prefix}`: {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}

impl ExpandError {
    /// Render the error as `compile_error!` tokens for a procedural macro.
    pub fn to_compile_error(&self) -> TokenStream {
        match self {
            ExpandError::Directive(err) => err.to_compile_error(),
            other => syn::Error::new(proc_macro2::Span::call_site(), other.to_string())
                .to_compile_error(),
        }
    }
}
