//! `remove_method!`: make a method raise an error instead of running.
//!
//! Rust cannot undefine a method, so each overload keeps its signature and
//! gets a body that reports `undefined method '<name>' for <type>.` through
//! the runtime support in the facade crate. `const` is dropped because the
//! support function cannot run in const contexts.

use syn::ext::IdentExt;
use syn::{parse_quote, ImplItemFn, LitStr, Path};

use crate::config::ExpandConfig;
use crate::directive::RemoveRequest;
use crate::resolver::{resolve, DirectiveSite};
use crate::signature::strip_block_markers;
use crate::tree::ItemTree;

/// Suppress every overload `request.from` resolves to; `None` on a miss.
pub fn remove_method(
    tree: &mut ItemTree,
    site: &DirectiveSite,
    request: &RemoveRequest,
    config: &ExpandConfig,
) -> Option<()> {
    (apply_remove(tree, site, request, config) > 0).then_some(())
}

pub(crate) fn apply_remove(
    tree: &mut ItemTree,
    site: &DirectiveSite,
    request: &RemoveRequest,
    config: &ExpandConfig,
) -> usize {
    let decls = resolve(tree, site, &request.from);
    if decls.is_empty() {
        tracing::debug!(
            from = %request.from,
            enclosing = %site,
            "remove_method: no matching declaration, skipping"
        );
        return 0;
    }

    let rewritten = decls
        .iter()
        .filter(|decl| tree.replace_method(&decl.location, suppressed(&decl.func, &config.crate_path)))
        .count();
    tracing::debug!(from = %request.from, overloads = rewritten, "remove_method: suppressed");
    rewritten
}

/// The suppressed form of `func`.
pub fn suppressed(func: &ImplItemFn, crate_path: &Path) -> ImplItemFn {
    let mut func = func.clone();
    strip_block_markers(&mut func.sig);
    func.sig.constness = None;

    let name = LitStr::new(&func.sig.ident.unraw().to_string(), func.sig.ident.span());
    func.attrs.push(parse_quote!(#[allow(unused_variables, unused_mut)]));
    func.block = parse_quote!({
        #crate_path::__private::undefined_method(#name, ::core::any::type_name::<Self>())
    });
    func
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::MethodReference;
    use crate::tree::{ImplAddr, MethodScope, ResolverService, TypeHandle};
    use quote::ToTokens;

    #[test]
    fn test_suppressed_body_and_signature() {
        let f: ImplItemFn = syn::parse_str(
            "pub const fn area(&self, #[block] scale: S) -> f64 { self.w * self.h }",
        )
        .unwrap();
        let out = suppressed(&f, &parse_quote!(::alias_method));
        let tokens = out.to_token_stream().to_string();
        assert!(tokens.contains("pub fn area (& self , scale : S) -> f64"), "{tokens}");
        assert!(tokens.contains(
            ":: alias_method :: __private :: undefined_method (\"area\" , :: core :: any :: type_name :: < Self > ())"
        ));
        assert!(!tokens.contains("self . w"));
        assert!(!tokens.contains("const"));
    }

    #[test]
    fn test_remove_every_overload_and_skip_misses() {
        let file: syn::File = parse_quote! {
            pub struct W<T>(T);
            impl W<u8> { fn get(&self) -> u8 { self.0 } }
            impl W<u16> { fn get(&self) -> u16 { self.0 } }
        };
        let mut tree = ItemTree::new(file.items);
        let ty = TypeHandle {
            module: vec![],
            module_path: vec![],
            name: "W".to_string(),
        };
        let site = DirectiveSite {
            module: vec![],
            impl_addr: ImplAddr { module: vec![], item: 1 },
            receiver: ty.clone(),
        };
        let config = ExpandConfig::default();

        let miss = RemoveRequest {
            from: MethodReference::parse("put").unwrap(),
        };
        assert_eq!(remove_method(&mut tree, &site, &miss, &config), None);

        let hit = RemoveRequest {
            from: MethodReference::parse("get").unwrap(),
        };
        assert_eq!(remove_method(&mut tree, &site, &hit, &config), Some(()));

        let decls = tree.find_methods(&ty, &hit.from, MethodScope::Instance);
        assert_eq!(decls.len(), 2);
        for decl in decls {
            let body = decl.func.block.to_token_stream().to_string();
            assert!(body.contains("undefined_method"), "{body}");
        }
    }
}
