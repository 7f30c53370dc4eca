//! Callable signatures and the forwarding calls built from them.
//!
//! A forwarder keeps the parameter *types* of the method it forwards to but
//! not necessarily its patterns: `(a, b): (i32, i32)` becomes `__arg0: (i32, i32)`
//! so the argument can be passed on by name.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{
    parse_quote, Attribute, Block, Expr, FnArg, GenericParam, Generics, Ident, Pat, PatIdent, PatType,
    Signature, Token, Type, TypeParamBound, WherePredicate,
};

use crate::BLOCK_MARKER;

/// A named, typed parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Ident,
    pub ty: Box<Type>,
    pub attrs: Vec<Attribute>,
}

/// How the trailing callback's arity is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    /// `Fn(A, B)` and friends, spelled out in the type or its bounds.
    Typed { arity: usize },
    /// Marked `#[block]`, with a type that does not reveal its arity.
    Implicit,
}

#[derive(Debug, Clone)]
pub struct CallbackParam {
    pub param: Parameter,
    pub kind: CallbackKind,
}

/// The parts of a method signature a forwarder has to reproduce.
#[derive(Debug, Clone)]
pub struct CallableSignature {
    pub receiver: Option<syn::Receiver>,
    pub params: Vec<Parameter>,
    pub callback: Option<CallbackParam>,
    pub generics: Generics,
    pub is_async: bool,
    pub is_unsafe: bool,
}

impl CallableSignature {
    pub fn from_signature(sig: &Signature) -> Self {
        let mut receiver = None;
        let mut params = Vec::new();
        let mut marked_block = false;

        let typed_count = sig
            .inputs
            .iter()
            .filter(|arg| matches!(arg, FnArg::Typed(_)))
            .count();

        for input in &sig.inputs {
            match input {
                FnArg::Receiver(recv) => receiver = Some(recv.clone()),
                FnArg::Typed(pat_type) => {
                    let index = params.len();
                    if index + 1 == typed_count && has_block_marker(&pat_type.attrs) {
                        marked_block = true;
                    }
                    params.push(Parameter {
                        name: param_name(&pat_type.pat, index),
                        ty: pat_type.ty.clone(),
                        attrs: pat_type
                            .attrs
                            .iter()
                            .filter(|attr| !attr.path().is_ident(BLOCK_MARKER))
                            .cloned()
                            .collect(),
                    });
                }
            }
        }

        let kind = match params.last() {
            Some(last) => match (callable_arity(&last.ty, &sig.generics), marked_block) {
                (Some(arity), _) => Some(CallbackKind::Typed { arity }),
                (None, true) => Some(CallbackKind::Implicit),
                (None, false) => None,
            },
            None => None,
        };
        let callback =
            kind.and_then(|kind| params.pop().map(|param| CallbackParam { param, kind }));

        Self {
            receiver,
            params,
            callback,
            generics: sig.generics.clone(),
            is_async: sig.asyncness.is_some(),
            is_unsafe: sig.unsafety.is_some(),
        }
    }

    /// Number of parameters, callback included, receiver excluded.
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.callback.is_some())
    }

    /// Inputs for a forwarding method: same types, plain identifier patterns.
    pub fn forwarding_inputs(&self) -> Punctuated<FnArg, Token![,]> {
        let mut inputs = Punctuated::new();
        if let Some(recv) = &self.receiver {
            let mut recv = recv.clone();
            // `mut self` only matters to the body being forwarded to
            if recv.reference.is_none() {
                recv.mutability = None;
            }
            inputs.push(FnArg::Receiver(recv));
        }
        for param in &self.params {
            inputs.push(typed_arg(param, false));
        }
        if let Some(callback) = &self.callback {
            let implicit = callback.kind == CallbackKind::Implicit;
            inputs.push(typed_arg(&callback.param, implicit));
        }
        inputs
    }

    /// Body of a forwarder: a call to `Self::<target>` with every argument.
    pub fn forwarding_body(&self, target: &Ident, callback_arity_hint: Option<usize>) -> Block {
        let mut args: Vec<Expr> = Vec::with_capacity(self.arity() + 1);
        if self.receiver.is_some() {
            args.push(parse_quote!(self));
        }
        for param in &self.params {
            let name = &param.name;
            args.push(parse_quote!(#name));
        }
        if let Some(callback) = &self.callback {
            let forwarder = CallbackForwarder::for_callback(callback.kind, callback_arity_hint);
            args.push(forwarder.forward(&callback.param.name));
        }

        let turbofish = self.turbofish();
        let mut call: Expr = parse_quote!(Self::#target #turbofish (#(#args),*));
        if self.is_async {
            call = parse_quote!(#call.await);
        }
        if self.is_unsafe {
            call = parse_quote!(unsafe { #call });
        }
        parse_quote!({ #call })
    }

    /// Explicit generic arguments for the forwarded call, when they can be
    /// given. Argument-position `impl Trait` forbids them, and an implicit
    /// block may be re-wrapped in a closure, so its type parameter is left
    /// to inference.
    fn turbofish(&self) -> TokenStream {
        let implicit_block = matches!(
            self.callback,
            Some(CallbackParam {
                kind: CallbackKind::Implicit,
                ..
            })
        );
        if implicit_block || self.all_params().any(|p| contains_impl_trait(&p.ty)) {
            return TokenStream::new();
        }

        let args: Vec<&Ident> = self
            .generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(tp) => Some(&tp.ident),
                GenericParam::Const(cp) => Some(&cp.ident),
                GenericParam::Lifetime(_) => None,
            })
            .collect();
        if args.is_empty() {
            TokenStream::new()
        } else {
            quote!(::<#(#args),*>)
        }
    }

    fn all_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .chain(self.callback.iter().map(|cb| &cb.param))
    }
}

/// Where a [`CallbackForwarder`] got its parameter count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwarderSource {
    /// Declared by an `Fn*` type or bound.
    Typed,
    /// Given by the directive's callback arity hint.
    Hinted,
    /// An implicit block with no hint; the count is whatever the block takes.
    Unhinted,
}

/// How a callback argument is handed to the forwarded call.
///
/// Typed callbacks are values and are passed through unchanged, and so is an
/// implicit block when the directive gives no hint: the block's type is a
/// generic parameter shared with the forwarded method, so any block arity
/// works. With a hint the block is re-wrapped in a closure taking `hint + 1`
/// parameters named `__block_arg0..` (hint `N - 1` forwards `N` parameters).
/// A wrong hint yields a closure of the wrong arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackForwarder {
    /// Parameters forwarded; `None` when the block is handed on as is.
    pub arity: Option<usize>,
    pub source: ForwarderSource,
}

impl CallbackForwarder {
    pub fn typed(arity: usize) -> Self {
        Self {
            arity: Some(arity),
            source: ForwarderSource::Typed,
        }
    }

    pub fn from_hint(max_index: usize) -> Self {
        Self {
            arity: Some(max_index + 1),
            source: ForwarderSource::Hinted,
        }
    }

    pub fn unhinted() -> Self {
        Self {
            arity: None,
            source: ForwarderSource::Unhinted,
        }
    }

    pub fn for_callback(kind: CallbackKind, hint: Option<usize>) -> Self {
        match kind {
            CallbackKind::Typed { arity } => Self::typed(arity),
            CallbackKind::Implicit => hint.map_or_else(Self::unhinted, Self::from_hint),
        }
    }

    pub fn param_names(&self) -> Vec<Ident> {
        (0..self.arity.unwrap_or(0))
            .map(|i| format_ident!("__block_arg{}", i))
            .collect()
    }

    pub fn forward(&self, callback: &Ident) -> Expr {
        match self.source {
            ForwarderSource::Typed | ForwarderSource::Unhinted => parse_quote!(#callback),
            ForwarderSource::Hinted => {
                let names = self.param_names();
                parse_quote!(move |#(#names),*| #callback(#(#names),*))
            }
        }
    }
}

pub(crate) fn has_block_marker(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(BLOCK_MARKER))
}

/// `#[block]` may only mark the last parameter, and only when its type is
/// `impl Trait` or a type parameter of the method itself: a forwarded block
/// is a new closure, which no other type can hold.
pub fn check_block_markers(sig: &Signature) -> syn::Result<()> {
    let typed: Vec<&PatType> = sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let mut errors: Option<syn::Error> = None;
    for (index, pat_type) in typed.iter().enumerate() {
        let Some(marker) = pat_type
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident(BLOCK_MARKER))
        else {
            continue;
        };
        let message = if index + 1 != typed.len() {
            Some("#[block] must mark the last parameter")
        } else if !accepts_block(&pat_type.ty, &sig.generics) {
            Some("#[block] needs a parameter typed as `impl Trait` or as a type parameter of this method")
        } else {
            None
        };
        if let Some(message) = message {
            let err = syn::Error::new_spanned(marker, message);
            match &mut errors {
                Some(existing) => existing.combine(err),
                None => errors = Some(err),
            }
        }
    }
    errors.map_or(Ok(()), Err)
}

fn accepts_block(ty: &Type, generics: &Generics) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Paren(p) => accepts_block(&p.elem, generics),
        Type::Group(g) => accepts_block(&g.elem, generics),
        Type::Path(tp) if tp.qself.is_none() && tp.path.segments.len() == 1 => {
            let segment = &tp.path.segments[0];
            segment.arguments.is_empty()
                && generics.type_params().any(|param| param.ident == segment.ident)
        }
        _ => callable_arity(ty, generics).is_some(),
    }
}

/// Remove `#[block]` markers from every parameter of `sig`.
pub fn strip_block_markers(sig: &mut Signature) {
    for input in sig.inputs.iter_mut() {
        if let FnArg::Typed(pat_type) = input {
            pat_type
                .attrs
                .retain(|attr| !attr.path().is_ident(BLOCK_MARKER));
        }
    }
}

fn param_name(pat: &Pat, index: usize) -> Ident {
    match pat {
        Pat::Ident(pat_ident) if pat_ident.subpat.is_none() => pat_ident.ident.clone(),
        _ => format_ident!("__arg{}", index),
    }
}

fn typed_arg(param: &Parameter, mutable: bool) -> FnArg {
    let pat = Pat::Ident(PatIdent {
        attrs: Vec::new(),
        by_ref: None,
        mutability: mutable.then(Default::default),
        ident: param.name.clone(),
        subpat: None,
    });
    FnArg::Typed(PatType {
        attrs: param.attrs.clone(),
        pat: Box::new(pat),
        colon_token: Default::default(),
        ty: param.ty.clone(),
    })
}

/// Parameter count of an `Fn`-family callback type, looking through
/// references, smart pointers and generic bounds.
pub fn callable_arity(ty: &Type, generics: &Generics) -> Option<usize> {
    match ty {
        Type::ImplTrait(it) => bounds_arity(it.bounds.iter()),
        Type::TraitObject(to) => bounds_arity(to.bounds.iter()),
        Type::Reference(r) => callable_arity(&r.elem, generics),
        Type::Paren(p) => callable_arity(&p.elem, generics),
        Type::Group(g) => callable_arity(&g.elem, generics),
        Type::Path(tp) if tp.qself.is_none() => {
            let last = tp.path.segments.last()?;
            if tp.path.segments.len() == 1 && last.arguments.is_empty() {
                return generic_param_arity(&last.ident, generics);
            }
            if matches!(last.ident.to_string().as_str(), "Box" | "Rc" | "Arc") {
                if let syn::PathArguments::AngleBracketed(args) = &last.arguments {
                    return args.args.iter().find_map(|arg| match arg {
                        syn::GenericArgument::Type(inner) => callable_arity(inner, generics),
                        _ => None,
                    });
                }
            }
            None
        }
        _ => None,
    }
}

fn generic_param_arity(ident: &Ident, generics: &Generics) -> Option<usize> {
    let inline = generics.type_params().find(|tp| tp.ident == *ident).and_then(|tp| {
        bounds_arity(tp.bounds.iter())
    });
    if inline.is_some() {
        return inline;
    }
    generics.where_clause.as_ref()?.predicates.iter().find_map(|pred| match pred {
        WherePredicate::Type(pt) => match &pt.bounded_ty {
            Type::Path(bounded) if bounded.path.is_ident(ident) => {
                bounds_arity(pt.bounds.iter())
            }
            _ => None,
        },
        _ => None,
    })
}

fn bounds_arity<'a>(mut bounds: impl Iterator<Item = &'a TypeParamBound>) -> Option<usize> {
    bounds.find_map(|bound| {
        let TypeParamBound::Trait(trait_bound) = bound else {
            return None;
        };
        let last = trait_bound.path.segments.last()?;
        if !matches!(last.ident.to_string().as_str(), "Fn" | "FnMut" | "FnOnce") {
            return None;
        }
        match &last.arguments {
            syn::PathArguments::Parenthesized(args) => Some(args.inputs.len()),
            _ => None,
        }
    })
}

fn contains_impl_trait(ty: &Type) -> bool {
    struct Finder(bool);
    impl<'ast> Visit<'ast> for Finder {
        fn visit_type_impl_trait(&mut self, _: &'ast syn::TypeImplTrait) {
            self.0 = true;
        }
    }
    let mut finder = Finder(false);
    finder.visit_type(ty);
    finder.0
}
