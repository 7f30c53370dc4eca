//! `alias_method!`: give an existing method a second name.
//!
//! For each overload of the referenced method three functions are produced
//! in the impl block that declares it:
//!
//! 1. a hidden copy holding the original body, named from the original name
//!    and the position of its declaration;
//! 2. the original name, now a forwarder to the hidden copy;
//! 3. the alias, a forwarder of the same shape.
//!
//! Aliasing the same method twice is not idempotent: the second pass finds
//! the forwarder from the first, derives the same hidden name from the same
//! declaration position and emits duplicate definitions, which rustc rejects.

use quote::format_ident;
use syn::ext::IdentExt;
use syn::{parse_quote, Attribute, Ident, ImplItem, ImplItemFn, LitStr};

use crate::config::ExpandConfig;
use crate::directive::AliasRequest;
use crate::resolver::{resolve, DirectiveSite};
use crate::signature::{strip_block_markers, CallableSignature, CallbackKind};
use crate::tree::ItemTree;

/// The three functions generated for one overload.
#[derive(Debug, Clone)]
pub struct AliasedOverload {
    pub hidden: ImplItemFn,
    pub forwarder: ImplItemFn,
    pub alias: ImplItemFn,
}

/// Alias every overload `request.from` resolves to.
///
/// Returns `None` when the reference matches nothing; the tree is left
/// untouched in that case. A misspelled or missing source method is not an
/// error.
pub fn alias_method(
    tree: &mut ItemTree,
    site: &DirectiveSite,
    request: &AliasRequest,
    config: &ExpandConfig,
) -> Option<()> {
    (apply_alias(tree, site, request, config) > 0).then_some(())
}

/// Same as [`alias_method`], returning the number of overloads rewritten.
pub(crate) fn apply_alias(
    tree: &mut ItemTree,
    site: &DirectiveSite,
    request: &AliasRequest,
    config: &ExpandConfig,
) -> usize {
    let decls = resolve(tree, site, &request.from);
    if decls.is_empty() {
        tracing::debug!(
            from = %request.from,
            to = %request.to,
            enclosing = %site,
            "alias_method: no matching declaration, skipping"
        );
        return 0;
    }

    let mut rewritten = 0;
    for decl in decls {
        let overload = alias_overload(&decl.func, &request.to, request.callback_arity_hint, config);
        tracing::trace!(
            from = %request.from,
            hidden = %overload.hidden.sig.ident,
            alias = %overload.alias.sig.ident,
            "alias_method: generated overload"
        );

        if !tree.replace_method(&decl.location, overload.forwarder) {
            continue;
        }
        if let Some(imp) = tree.impl_at_mut(&decl.location.impl_addr) {
            imp.items.push(ImplItem::Fn(overload.hidden));
            imp.items.push(ImplItem::Fn(overload.alias));
            rewritten += 1;
        }
    }

    tracing::debug!(
        from = %request.from,
        to = %request.to,
        overloads = rewritten,
        "alias_method: aliased"
    );
    rewritten
}

/// Build the hidden copy and both forwarders for one declaration.
pub fn alias_overload(
    func: &ImplItemFn,
    to: &Ident,
    callback_arity_hint: Option<usize>,
    config: &ExpandConfig,
) -> AliasedOverload {
    let hidden_ident = hidden_name(func, &config.hidden_prefix);
    let signature = CallableSignature::from_signature(&func.sig);

    let mut hidden = func.clone();
    hidden.sig.ident = hidden_ident.clone();
    strip_block_markers(&mut hidden.sig);
    hidden.attrs = func
        .attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .cloned()
        .collect();
    hidden.attrs.push(parse_quote!(#[doc(hidden)]));

    let mut forwarder_attrs: Vec<Attribute> = func
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc") || is_signature_attr(attr))
        .cloned()
        .collect();
    forwarder_attrs.push(parse_quote!(#[inline]));
    if matches!(
        signature.callback.as_ref().map(|cb| cb.kind),
        Some(CallbackKind::Implicit)
    ) {
        forwarder_attrs.push(parse_quote!(#[allow(unused_mut)]));
    }

    let forwarder = forwarding_fn(
        func,
        func.sig.ident.clone(),
        &hidden_ident,
        &signature,
        callback_arity_hint,
        forwarder_attrs.clone(),
    );

    let doc = LitStr::new(
        &format!(" Alias of [`Self::{}`].", func.sig.ident),
        to.span(),
    );
    let mut alias_attrs: Vec<Attribute> = vec![parse_quote!(#[doc = #doc])];
    alias_attrs.extend(
        forwarder_attrs
            .into_iter()
            .filter(|attr| !attr.path().is_ident("doc")),
    );
    let alias = forwarding_fn(
        func,
        to.clone(),
        &hidden_ident,
        &signature,
        callback_arity_hint,
        alias_attrs,
    );

    AliasedOverload {
        hidden,
        forwarder,
        alias,
    }
}

/// `<prefix><name>_<column>_<line>`, from the span of the declared name.
pub fn hidden_name(func: &ImplItemFn, prefix: &str) -> Ident {
    let start = func.sig.ident.span().start();
    format_ident!(
        "{}{}_{}_{}",
        prefix,
        func.sig.ident.unraw(),
        start.column,
        start.line
    )
}

fn forwarding_fn(
    func: &ImplItemFn,
    name: Ident,
    target: &Ident,
    signature: &CallableSignature,
    callback_arity_hint: Option<usize>,
    attrs: Vec<Attribute>,
) -> ImplItemFn {
    let mut sig = func.sig.clone();
    sig.ident = name;
    sig.inputs = signature.forwarding_inputs();

    ImplItemFn {
        attrs,
        vis: func.vis.clone(),
        defaultness: None,
        sig,
        block: signature.forwarding_body(target, callback_arity_hint),
    }
}

/// Attributes that describe how a function may be called rather than what
/// its body does; they go on every generated function.
fn is_signature_attr(attr: &Attribute) -> bool {
    const NAMES: &[&str] = &[
        "cfg",
        "cfg_attr",
        "must_use",
        "deprecated",
        "allow",
        "expect",
        "warn",
        "deny",
        "forbid",
        "track_caller",
    ];
    NAMES.iter().any(|name| attr.path().is_ident(name))
}
