//! Parsing of `alias_method!(...)` and `remove_method!(...)` arguments.
//!
//! Directives are item-position macro invocations inside an impl block:
//!
//! ```text
//! alias_method!("sum", "self.add");
//! alias_method!(each_pair, "each", 1);
//! remove_method!("with");
//! ```

use serde::Serialize;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, Lit, LitInt, LitStr, Macro, Token};

use crate::reference::MethodReference;

/// `alias_method!(to, from [, callback_arity_hint])`.
#[derive(Debug, Clone)]
pub struct AliasRequest {
    pub to: Ident,
    pub from: MethodReference,
    /// Highest parameter index of an implicit block; ignored otherwise.
    /// Without one an implicit block is forwarded as is.
    pub callback_arity_hint: Option<usize>,
}

/// `remove_method!(from)`.
#[derive(Debug, Clone)]
pub struct RemoveRequest {
    pub from: MethodReference,
}

#[derive(Debug, Clone)]
pub enum Directive {
    Alias(AliasRequest),
    Remove(RemoveRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    AliasMethod,
    RemoveMethod,
}

impl DirectiveKind {
    /// The directive a macro invocation names, judged by its last path segment.
    pub fn of(mac: &Macro) -> Option<Self> {
        let last = mac.path.segments.last()?;
        if last.ident == "alias_method" {
            Some(DirectiveKind::AliasMethod)
        } else if last.ident == "remove_method" {
            Some(DirectiveKind::RemoveMethod)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKind::AliasMethod => "alias_method",
            DirectiveKind::RemoveMethod => "remove_method",
        }
    }
}

impl Directive {
    /// Parse a macro invocation as a directive. `None` when the macro is not
    /// one of ours.
    pub fn from_macro(mac: &Macro) -> Option<syn::Result<Directive>> {
        let kind = DirectiveKind::of(mac)?;
        Some(match kind {
            DirectiveKind::AliasMethod => mac.parse_body::<AliasRequest>().map(Directive::Alias),
            DirectiveKind::RemoveMethod => mac.parse_body::<RemoveRequest>().map(Directive::Remove),
        })
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Alias(_) => DirectiveKind::AliasMethod,
            Directive::Remove(_) => DirectiveKind::RemoveMethod,
        }
    }

    pub fn from(&self) -> &MethodReference {
        match self {
            Directive::Alias(request) => &request.from,
            Directive::Remove(request) => &request.from,
        }
    }
}

impl Parse for AliasRequest {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let to = parse_alias_name(input)?;
        input.parse::<Token![,]>()?;
        let from = parse_reference(input, "alias_method")?;

        let mut callback_arity_hint = None;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if !input.is_empty() {
                let lit: LitInt = input.parse().map_err(|err| {
                    syn::Error::new(
                        err.span(),
                        "alias_method: the callback arity hint must be an integer literal",
                    )
                })?;
                callback_arity_hint = Some(lit.base10_parse::<usize>()?);
                // Optional trailing comma
                if input.peek(Token![,]) {
                    input.parse::<Token![,]>()?;
                }
            }
        }

        if !input.is_empty() {
            return Err(input.error("alias_method: unexpected extra arguments"));
        }

        Ok(AliasRequest {
            to,
            from,
            callback_arity_hint,
        })
    }
}

impl Parse for RemoveRequest {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let from = parse_reference(input, "remove_method")?;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        if !input.is_empty() {
            return Err(input.error("remove_method: unexpected extra arguments"));
        }
        Ok(RemoveRequest { from })
    }
}

/// The alias name: a string literal or a bare identifier.
fn parse_alias_name(input: ParseStream) -> syn::Result<Ident> {
    if input.peek(Ident) {
        return input.parse();
    }
    match input.parse::<Lit>()? {
        Lit::Str(s) => {
            let value = s.value();
            if value.trim().is_empty() {
                return Err(syn::Error::new_spanned(
                    s,
                    "alias_method: the alias name must not be empty",
                ));
            }
            let mut ident: Ident = syn::parse_str(value.trim()).map_err(|_| {
                syn::Error::new_spanned(
                    &s,
                    format!("alias_method: `{value}` is not a valid method name"),
                )
            })?;
            ident.set_span(s.span());
            Ok(ident)
        }
        other => Err(syn::Error::new_spanned(
            other,
            "alias_method: the alias name must be a string literal or an identifier",
        )),
    }
}

fn parse_reference(input: ParseStream, directive: &str) -> syn::Result<MethodReference> {
    if !input.peek(LitStr) {
        return Err(input.error(format!(
            "{directive}: the method reference must be a string literal"
        )));
    }
    let s: LitStr = input.parse()?;
    MethodReference::parse(&s.value())
        .map_err(|err| syn::Error::new_spanned(&s, format!("{directive}: {err}")))
}
