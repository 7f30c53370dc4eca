//! Procedural macros for alias-method
//!
//! This crate provides one attribute, re-exported by the `alias_method` crate:
//! - `#[method_aliases]` - Expand `alias_method!` / `remove_method!` directives
//!   written inside inherent impl blocks

use proc_macro::TokenStream;
use quote::ToTokens;
use syn::parse_macro_input;

use alias_method_core::{expand_item, ExpandConfig};

/// Expand method directives in an inherent impl block or an inline module.
///
/// Inside the annotated item, impl blocks may contain:
///
/// - `alias_method!(to, from [, callback_arity_hint]);` - define `to` as a
///   second name for every overload of `from`
/// - `remove_method!(from);` - make every overload of `from` panic with
///   `undefined method '<name>' for <type>.` when called
///
/// `from` is `name` (a method taking `self`), `self.name` (an associated
/// function), or `path::To::Type.name` (an associated function of another
/// type in the annotated module tree). References that match nothing are
/// ignored.
///
/// A trailing callback parameter typed as `impl Trait` or as a type
/// parameter of the method can be marked `#[block]`. Without a hint the block
/// is passed on unchanged; with one it is re-wrapped in a closure and the
/// hint gives the highest index of the block's parameters (0 for one
/// parameter). `#[block]` anywhere else is a compile error.
///
/// Aliasing to a name the impl block already defines is a compile error
/// pointing at the alias name.
///
/// # Attributes
///
/// - `crate = "..."` - path to the `alias_method` crate when re-exported
/// - `hidden_prefix = "..."` - prefix for the hidden copies
///
/// # Example
///
/// ```ignore
/// #[method_aliases]
/// impl Calc {
///     pub fn add(x: i32, y: i32) -> i32 { x + y }
///     alias_method!("sum", "self.add");
/// }
///
/// assert_eq!(Calc::sum(3, 4), 7);
/// ```
#[proc_macro_attribute]
pub fn method_aliases(attr: TokenStream, input: TokenStream) -> TokenStream {
    let config = match ExpandConfig::from_attribute_args(attr.into()) {
        Ok(config) => config,
        Err(err) => return err.to_compile_error().into(),
    };
    let item = parse_macro_input!(input as syn::Item);

    match expand_item(item, &config) {
        Ok(expanded) => expanded.item.into_token_stream().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
