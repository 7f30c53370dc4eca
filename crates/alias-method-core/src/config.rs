//! Expansion settings.
//!
//! Parsed from the attribute arguments of `#[method_aliases(...)]`:
//!
//! ```text
//! #[method_aliases(crate = "my_prelude::alias_method", hidden_prefix = "__orig_")]
//! ```
//!
//! - `crate` - path to the `alias_method` facade crate, used by suppressed
//!   bodies (default `::alias_method`); needed when the crate is re-exported
//! - `hidden_prefix` - prefix for hidden copies (default `__alias_method_`)

use proc_macro2::TokenStream;
use syn::parse::Parser;
use syn::{parse_quote, LitStr, Path};

use crate::error::ExpandError;

pub const DEFAULT_HIDDEN_PREFIX: &str = "__alias_method_";

#[derive(Debug, Clone)]
pub struct ExpandConfig {
    pub crate_path: Path,
    pub hidden_prefix: String,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            crate_path: parse_quote!(::alias_method),
            hidden_prefix: DEFAULT_HIDDEN_PREFIX.to_string(),
        }
    }
}

impl ExpandConfig {
    /// Parse `crate = "..."` and `hidden_prefix = "..."` attribute arguments.
    pub fn from_attribute_args(args: TokenStream) -> syn::Result<Self> {
        let mut config = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                config.crate_path = value.parse()?;
                Ok(())
            } else if meta.path.is_ident("hidden_prefix") {
                let value: LitStr = meta.value()?.parse()?;
                validate_prefix(&value.value())
                    .map_err(|err| syn::Error::new_spanned(&value, err.to_string()))?;
                config.hidden_prefix = value.value();
                Ok(())
            } else {
                Err(meta.error("method_aliases: unknown argument, expected `crate` or `hidden_prefix`"))
            }
        });
        parser.parse2(args)?;
        Ok(config)
    }

    pub fn with_crate_path(mut self, path: &str) -> Result<Self, ExpandError> {
        self.crate_path = syn::parse_str(path)?;
        Ok(self)
    }

    pub fn with_hidden_prefix(mut self, prefix: &str) -> Result<Self, ExpandError> {
        validate_prefix(prefix)?;
        self.hidden_prefix = prefix.to_string();
        Ok(self)
    }
}

/// A prefix must start an identifier and contain only `[A-Za-z0-9_]`.
fn validate_prefix(prefix: &str) -> Result<(), ExpandError> {
    let invalid = |reason: &str| ExpandError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason: reason.to_string(),
    };
    let Some(first) = prefix.chars().next() else {
        return Err(invalid("must not be empty"));
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter or `_`"));
    }
    if !prefix.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()) {
        return Err(invalid("may only contain ASCII letters, digits and `_`"));
    }
    Ok(())
}
