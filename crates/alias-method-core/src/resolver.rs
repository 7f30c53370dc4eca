//! Turning a [`MethodReference`] into the declarations it names.

use std::fmt;

use crate::reference::{MethodReference, ReceiverScope};
use crate::tree::{ImplAddr, MethodDecl, MethodScope, ModuleAddr, ResolverService, TypeHandle};

/// Where a directive was written: the impl block it sat in, that block's
/// module, and the type the block is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSite {
    /// Module type paths in the directive are resolved from.
    pub module: ModuleAddr,
    pub impl_addr: ImplAddr,
    /// Self type of the enclosing impl, e.g. `Wrapper` for `impl<T> Wrapper<T>`.
    pub receiver: TypeHandle,
}

impl DirectiveSite {
    pub fn enclosing_type(&self) -> TypeHandle {
        self.receiver.clone()
    }
}

impl fmt::Display for DirectiveSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.enclosing_type().fmt(f)
    }
}

/// Every declaration `reference` names, as seen from `site`.
///
/// Without a scope the enclosing type's methods are searched; `self.` searches
/// its associated functions; a type path is resolved first and its
/// associated functions searched. Nothing found is an empty result, not an
/// error.
pub fn resolve(
    resolver: &impl ResolverService,
    site: &DirectiveSite,
    reference: &MethodReference,
) -> Vec<MethodDecl> {
    let (receiver, scope) = match &reference.scope {
        ReceiverScope::Instance => (site.enclosing_type(), MethodScope::Instance),
        ReceiverScope::Static => (site.enclosing_type(), MethodScope::Static),
        ReceiverScope::Type(path) => match resolver.find_type(&site.module, path) {
            Some(handle) => (handle, MethodScope::Static),
            None => {
                tracing::debug!(%reference, path = %path, "receiver type not found");
                return Vec::new();
            }
        },
    };

    let found = resolver.find_methods(&receiver, reference, scope);
    tracing::debug!(
        %reference,
        receiver = %receiver,
        overloads = found.len(),
        "resolved method reference"
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ItemTree;
    use syn::parse_quote;

    fn tree() -> ItemTree {
        let file: syn::File = parse_quote! {
            pub struct Calc;
            impl Calc {
                fn add(x: i32, y: i32) -> i32 { x + y }
                fn double(&self, x: i32) -> i32 { x * 2 }
            }
            mod geo {
                pub struct Point;
                impl Point {
                    fn origin() -> Self { Point }
                    fn norm(&self) -> f64 { 0.0 }
                }
            }
        };
        ItemTree::new(file.items)
    }

    fn calc_site() -> DirectiveSite {
        DirectiveSite {
            module: vec![],
            impl_addr: ImplAddr { module: vec![], item: 1 },
            receiver: TypeHandle {
                module: vec![],
                module_path: vec![],
                name: "Calc".to_string(),
            },
        }
    }

    fn lookup(reference: &str) -> Vec<String> {
        let reference = MethodReference::parse(reference).unwrap();
        resolve(&tree(), &calc_site(), &reference)
            .into_iter()
            .map(|decl| decl.func.sig.ident.to_string())
            .collect()
    }

    #[test]
    fn test_scopes() {
        assert_eq!(lookup("double"), vec!["double"]);
        assert_eq!(lookup("self.add"), vec!["add"]);
        // `add` has no receiver, so the instance scope does not see it
        assert!(lookup("add").is_empty());
        assert!(lookup("self.double").is_empty());
    }

    #[test]
    fn test_type_receiver_matches_associated_functions() {
        assert_eq!(lookup("geo::Point.origin"), vec!["origin"]);
        assert_eq!(lookup("::geo::Point.origin"), vec!["origin"]);
        assert!(lookup("geo::Point.norm").is_empty());
    }

    #[test]
    fn test_misses_are_empty() {
        assert!(lookup("nothing").is_empty());
        assert!(lookup("Nowhere.add").is_empty());
        assert!(lookup("geo::Nowhere.origin").is_empty());
    }

    #[test]
    fn test_site_display() {
        let site = DirectiveSite {
            module: vec![2],
            impl_addr: ImplAddr { module: vec![2], item: 1 },
            receiver: TypeHandle {
                module: vec![2],
                module_path: vec!["geo".to_string()],
                name: "Point".to_string(),
            },
        };
        assert_eq!(site.to_string(), "geo::Point");
    }
}
