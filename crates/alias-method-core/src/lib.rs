//! Method aliases and method suppression for inherent impl blocks.
//!
//! This crate holds the engine behind `#[method_aliases]`. It works on
//! `syn` trees, so the same code drives the procedural macro and the
//! `alias-expand` source rewriter:
//!
//! - [`reference`] - the `[scope.]name` grammar used to point at a method
//! - [`tree`] - the module/impl tree and the [`ResolverService`] over it
//! - [`signature`] - callable signatures and callback forwarders
//! - [`generator`] - `alias_method!`: hidden copy + two forwarders per overload
//! - [`suppress`] - `remove_method!`: bodies replaced by a runtime error
//! - [`directive`] - parsing of the directive macro arguments
//! - [`expand`] - the pass that applies every directive in source order
//!
//! # Example
//!
//! ```
//! use alias_method_core::{expand_item, ExpandConfig};
//! use quote::ToTokens;
//!
//! let item: syn::Item = syn::parse_quote! {
//!     impl Calc {
//!         fn add(x: i32, y: i32) -> i32 { x + y }
//!         alias_method!("sum", "self.add");
//!     }
//! };
//! let expanded = expand_item(item, &ExpandConfig::default()).unwrap();
//! assert_eq!(expanded.report.directives[0].overloads, 1);
//! assert!(expanded.item.to_token_stream().to_string().contains("fn sum"));
//! ```

pub mod config;
pub mod directive;
pub mod error;
pub mod expand;
pub mod generator;
pub mod reference;
pub mod resolver;
pub mod signature;
pub mod suppress;
pub mod tree;

pub use config::ExpandConfig;
pub use directive::{AliasRequest, Directive, DirectiveKind, RemoveRequest};
pub use error::{ExpandError, ReferenceError};
pub use expand::{
    expand, expand_file, expand_item, strip_marker_attributes, DirectiveOutcome, ExpandedFile,
    ExpandedItem, Expansion, ExpansionReport,
};
pub use generator::{alias_method, alias_overload, hidden_name, AliasedOverload};
pub use reference::{MethodReference, PathSegment, ReceiverScope, TypePath};
pub use resolver::{resolve, DirectiveSite};
pub use signature::{
    check_block_markers, CallableSignature, CallbackForwarder, CallbackKind, CallbackParam,
    ForwarderSource, Parameter,
};
pub use suppress::{remove_method, suppressed};
pub use tree::{ImplAddr, ItemTree, MethodDecl, MethodLocation, MethodScope, ResolverService, TypeHandle};

/// Attribute that marks a trailing callback parameter as an implicit block.
pub const BLOCK_MARKER: &str = "block";

/// Name of the attribute macro that drives the expansion.
pub const ATTRIBUTE_NAME: &str = "method_aliases";
