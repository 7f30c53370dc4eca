//! The expansion pass: find every directive, apply them in order, clean up.

use serde::Serialize;
use syn::visit_mut::{self, VisitMut};
use syn::{Ident, ImplItem, ImplItemFn, Item, ItemImpl, Macro};

use crate::config::ExpandConfig;
use crate::directive::{Directive, DirectiveKind};
use crate::error::ExpandError;
use crate::generator::apply_alias;
use crate::resolver::DirectiveSite;
use crate::signature::{check_block_markers, strip_block_markers};
use crate::suppress::apply_remove;
use crate::tree::{ImplAddr, ItemTree};
use crate::ATTRIBUTE_NAME;

/// What happened to one directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveOutcome {
    pub kind: DirectiveKind,
    /// The reference as written, e.g. `self.add`.
    pub from: String,
    /// Alias name for `alias_method!`.
    pub to: Option<String>,
    /// Type whose impl block held the directive.
    pub enclosing: String,
    /// Overloads rewritten; 0 when the reference matched nothing.
    pub overloads: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionReport {
    pub directives: Vec<DirectiveOutcome>,
}

impl ExpansionReport {
    /// Directives whose reference matched nothing.
    pub fn misses(&self) -> impl Iterator<Item = &DirectiveOutcome> {
        self.directives.iter().filter(|d| d.overloads == 0)
    }
}

#[derive(Debug)]
pub struct Expansion {
    pub items: Vec<Item>,
    pub report: ExpansionReport,
}

#[derive(Debug)]
pub struct ExpandedItem {
    pub item: Item,
    pub report: ExpansionReport,
}

#[derive(Debug)]
pub struct ExpandedFile {
    pub file: syn::File,
    pub report: ExpansionReport,
}

/// A directive taken out of its impl block, not yet resolved.
struct Pending {
    impl_addr: ImplAddr,
    mac: Macro,
    directive: Directive,
}

/// Expand every directive found in `items`, which form the namespace root.
pub fn expand(items: Vec<Item>, config: &ExpandConfig) -> Result<Expansion, ExpandError> {
    let mut tree = ItemTree::new(items);

    let mut pending = Vec::new();
    let mut errors = Errors::default();
    collect_directives(tree.items_mut(), &mut Vec::new(), &mut pending, &mut errors);

    let mut directives = Vec::with_capacity(pending.len());
    for Pending {
        impl_addr,
        mac,
        directive,
    } in pending
    {
        let receiver = tree
            .impl_at(&impl_addr)
            .and_then(|imp| tree.impl_target(&impl_addr.module, &imp.self_ty));
        match receiver {
            Some(receiver) => {
                let site = DirectiveSite {
                    module: impl_addr.module.clone(),
                    impl_addr,
                    receiver,
                };
                directives.push((site, directive));
            }
            None => errors.push(syn::Error::new_spanned(
                &mac,
                "method directives need an impl block for a named type",
            )),
        }
    }
    errors.into_result()?;

    let mut report = ExpansionReport::default();
    for (site, directive) in directives {
        let overloads = match &directive {
            Directive::Alias(request) => {
                let overloads = apply_alias(&mut tree, &site, request, config);
                if overloads > 0 {
                    check_unique_definitions(&tree, &request.to)?;
                }
                overloads
            }
            Directive::Remove(request) => apply_remove(&mut tree, &site, request, config),
        };
        report.directives.push(DirectiveOutcome {
            kind: directive.kind(),
            from: directive.from().to_string(),
            to: match &directive {
                Directive::Alias(request) => Some(request.to.to_string()),
                Directive::Remove(_) => None,
            },
            enclosing: site.to_string(),
            overloads,
        });
    }

    let mut items = tree.into_items();
    let mut cleaner = MarkerStripper;
    for item in &mut items {
        cleaner.visit_item_mut(item);
    }
    tracing::debug!(directives = report.directives.len(), "expansion finished");
    Ok(Expansion { items, report })
}

/// Expand the item a `#[method_aliases]` attribute is attached to: an
/// inherent impl block or an inline module.
pub fn expand_item(item: Item, config: &ExpandConfig) -> Result<ExpandedItem, ExpandError> {
    match item {
        Item::Impl(imp) if imp.trait_.is_none() => {
            let Expansion { mut items, report } = expand(vec![Item::Impl(imp)], config)?;
            let item = items.pop().ok_or(ExpandError::UnsupportedItem)?;
            Ok(ExpandedItem { item, report })
        }
        Item::Mod(mut module) => {
            let Some((brace, content)) = module.content.take() else {
                return Err(ExpandError::UnsupportedItem);
            };
            let Expansion { items, report } = expand(content, config)?;
            module.content = Some((brace, items));
            Ok(ExpandedItem {
                item: Item::Mod(module),
                report,
            })
        }
        _ => Err(ExpandError::UnsupportedItem),
    }
}

/// Expand a whole source file. Its items form the namespace root; the
/// shebang and inner attributes are kept as they are.
pub fn expand_file(mut file: syn::File, config: &ExpandConfig) -> Result<ExpandedFile, ExpandError> {
    let Expansion { items, report } = expand(std::mem::take(&mut file.items), config)?;
    file.items = items;
    Ok(ExpandedFile { file, report })
}

/// Remove `#[method_aliases]` attributes and `#[block]` markers from a tree
/// that has been expanded without the attribute macro.
pub fn strip_marker_attributes(items: &mut [Item]) {
    let mut stripper = MarkerStripper;
    for item in items {
        stripper.visit_item_mut(item);
    }
}

#[derive(Default)]
struct Errors(Option<syn::Error>);

impl Errors {
    fn push(&mut self, err: syn::Error) {
        match &mut self.0 {
            Some(existing) => existing.combine(err),
            None => self.0 = Some(err),
        }
    }

    fn into_result(self) -> Result<(), ExpandError> {
        self.0.map_or(Ok(()), |err| Err(err.into()))
    }
}

/// An alias that lands next to a function of the same name would be
/// rejected by rustc with no pointer to the directive; report it here.
fn check_unique_definitions(tree: &ItemTree, name: &Ident) -> Result<(), ExpandError> {
    for (_, imp) in tree.inherent_impls() {
        let count = imp
            .items
            .iter()
            .filter(|item| matches!(item, ImplItem::Fn(f) if f.sig.ident == *name))
            .count();
        if count > 1 {
            let self_ty = &imp.self_ty;
            return Err(syn::Error::new(
                name.span(),
                format!(
                    "alias_method: duplicate definitions with name `{name}` in `impl {}`",
                    quote::quote!(#self_ty)
                ),
            )
            .into());
        }
    }
    Ok(())
}

fn collect_directives(
    items: &mut [Item],
    module: &mut Vec<usize>,
    out: &mut Vec<Pending>,
    errors: &mut Errors,
) {
    for (index, item) in items.iter_mut().enumerate() {
        match item {
            Item::Impl(imp) => {
                for impl_item in &imp.items {
                    if let ImplItem::Fn(func) = impl_item {
                        if let Err(err) = check_block_markers(&func.sig) {
                            errors.push(err);
                        }
                    }
                }
                let addr = ImplAddr {
                    module: module.clone(),
                    item: index,
                };
                take_impl_directives(imp, addr, out, errors);
            }
            Item::Mod(m) => {
                if let Some((_, content)) = &mut m.content {
                    module.push(index);
                    collect_directives(content, module, out, errors);
                    module.pop();
                }
            }
            _ => {}
        }
    }
}

fn take_impl_directives(
    imp: &mut ItemImpl,
    addr: ImplAddr,
    out: &mut Vec<Pending>,
    errors: &mut Errors,
) {
    if !imp
        .items
        .iter()
        .any(|item| matches!(item, ImplItem::Macro(m) if DirectiveKind::of(&m.mac).is_some()))
    {
        return;
    }

    let in_trait_impl = imp.trait_.is_some();
    let mut kept = Vec::with_capacity(imp.items.len());

    for item in std::mem::take(&mut imp.items) {
        let ImplItem::Macro(item_macro) = &item else {
            kept.push(item);
            continue;
        };
        let Some(parsed) = Directive::from_macro(&item_macro.mac) else {
            kept.push(item);
            continue;
        };

        if in_trait_impl {
            errors.push(syn::Error::new_spanned(
                &item_macro.mac,
                "method directives are only supported in inherent impl blocks, not trait impls",
            ));
            continue;
        }
        match parsed {
            Ok(directive) => out.push(Pending {
                impl_addr: addr.clone(),
                mac: item_macro.mac.clone(),
                directive,
            }),
            Err(err) => errors.push(err),
        }
    }

    imp.items = kept;
}

struct MarkerStripper;

impl VisitMut for MarkerStripper {
    fn visit_item_impl_mut(&mut self, imp: &mut ItemImpl) {
        imp.attrs.retain(|attr| !is_method_aliases_attr(attr));
        visit_mut::visit_item_impl_mut(self, imp);
    }

    fn visit_item_mod_mut(&mut self, module: &mut syn::ItemMod) {
        module.attrs.retain(|attr| !is_method_aliases_attr(attr));
        visit_mut::visit_item_mod_mut(self, module);
    }

    fn visit_impl_item_fn_mut(&mut self, func: &mut ImplItemFn) {
        strip_block_markers(&mut func.sig);
        visit_mut::visit_impl_item_fn_mut(self, func);
    }
}

fn is_method_aliases_attr(attr: &syn::Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ATTRIBUTE_NAME)
}
