//! The item tree an expansion runs over, and the lookups on it.
//!
//! The root of the tree is whatever the expansion was given: the single impl
//! block under `#[method_aliases]`, the contents of an annotated inline
//! module, or a whole file for `alias-expand`. Inline modules nest; modules
//! declared elsewhere (`mod foo;`) are opaque.

use std::fmt;

use syn::ext::IdentExt;
use syn::{ImplItem, ImplItemFn, Item, ItemImpl, Type};

use crate::reference::{MethodReference, PathSegment, TypePath};

/// Indices of the inline modules leading to a module, from the root.
pub type ModuleAddr = Vec<usize>;

/// Address of an impl block: its module and its index among that module's items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImplAddr {
    pub module: ModuleAddr,
    pub item: usize,
}

/// Address of a function inside an impl block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodLocation {
    pub impl_addr: ImplAddr,
    pub index: usize,
}

/// A type found by [`ResolverService::find_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    pub module: ModuleAddr,
    /// Module names along `module`, for display.
    pub module_path: Vec<String>,
    pub name: String,
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for module in &self.module_path {
            write!(f, "{module}::")?;
        }
        f.write_str(&self.name)
    }
}

/// One declaration of a method, as found by [`ResolverService::find_methods`].
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub location: MethodLocation,
    pub func: ImplItemFn,
}

/// Which functions a lookup should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodScope {
    /// Functions taking `self` in some form.
    Instance,
    /// Associated functions without a receiver.
    Static,
}

impl MethodScope {
    pub fn matches(self, func: &ImplItemFn) -> bool {
        let has_receiver = func.sig.receiver().is_some();
        match self {
            MethodScope::Instance => has_receiver,
            MethodScope::Static => !has_receiver,
        }
    }
}

/// Symbol lookups the generators need.
pub trait ResolverService {
    /// Resolve a type path starting from module `from`.
    fn find_type(&self, from: &[usize], path: &TypePath) -> Option<TypeHandle>;

    /// Every inherent-impl function of `ty` named `name` in `scope`, in
    /// declaration order.
    fn find_methods(&self, ty: &TypeHandle, name: &MethodReference, scope: MethodScope)
        -> Vec<MethodDecl>;
}

/// Owned tree of items with module addressing.
#[derive(Debug, Clone, Default)]
pub struct ItemTree {
    items: Vec<Item>,
}

impl ItemTree {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn module_items(&self, module: &[usize]) -> Option<&Vec<Item>> {
        let mut items = &self.items;
        for &index in module {
            match items.get(index) {
                Some(Item::Mod(m)) => items = &m.content.as_ref()?.1,
                _ => return None,
            }
        }
        Some(items)
    }

    pub fn module_items_mut(&mut self, module: &[usize]) -> Option<&mut Vec<Item>> {
        let mut items = &mut self.items;
        for &index in module {
            items = match items.get_mut(index) {
                Some(Item::Mod(m)) => &mut m.content.as_mut()?.1,
                _ => return None,
            };
        }
        Some(items)
    }

    /// Names of the modules along `module`.
    pub fn module_path(&self, module: &[usize]) -> Vec<String> {
        let mut names = Vec::with_capacity(module.len());
        let mut items = &self.items;
        for &index in module {
            match items.get(index) {
                Some(Item::Mod(m)) => {
                    names.push(m.ident.to_string());
                    match &m.content {
                        Some((_, content)) => items = content,
                        None => break,
                    }
                }
                _ => break,
            }
        }
        names
    }

    pub fn impl_at(&self, addr: &ImplAddr) -> Option<&ItemImpl> {
        match self.module_items(&addr.module)?.get(addr.item)? {
            Item::Impl(imp) => Some(imp),
            _ => None,
        }
    }

    pub fn impl_at_mut(&mut self, addr: &ImplAddr) -> Option<&mut ItemImpl> {
        match self.module_items_mut(&addr.module)?.get_mut(addr.item)? {
            Item::Impl(imp) => Some(imp),
            _ => None,
        }
    }

    /// Replace the function at `location`.
    pub fn replace_method(&mut self, location: &MethodLocation, func: ImplItemFn) -> bool {
        match self
            .impl_at_mut(&location.impl_addr)
            .and_then(|imp| imp.items.get_mut(location.index))
        {
            Some(slot) => {
                *slot = ImplItem::Fn(func);
                true
            }
            None => false,
        }
    }

    fn child_module(&self, module: &[usize], name: &str) -> Option<ModuleAddr> {
        let items = self.module_items(module)?;
        let index = items.iter().position(|item| match item {
            Item::Mod(m) => m.content.is_some() && m.ident == name,
            _ => false,
        })?;
        let mut child = module.to_vec();
        child.push(index);
        Some(child)
    }

    /// Follow the leading segments of a path from `start`.
    fn walk_modules(&self, start: &[usize], leading: &[PathSegment]) -> Option<ModuleAddr> {
        let mut module = start.to_vec();
        for segment in leading {
            match segment {
                PathSegment::SelfModule => {}
                PathSegment::Super => {
                    module.pop()?;
                }
                PathSegment::Named(name) => module = self.child_module(&module, name)?,
            }
        }
        Some(module)
    }

    /// A struct, enum, union or type alias named `name`, or an inherent impl
    /// of it, exists directly in `module`.
    fn declares_type(&self, module: &[usize], name: &str) -> bool {
        let Some(items) = self.module_items(module) else {
            return false;
        };
        items.iter().any(|item| match item {
            Item::Struct(s) => s.ident == name,
            Item::Enum(e) => e.ident == name,
            Item::Union(u) => u.ident == name,
            Item::Type(t) => t.ident == name,
            Item::Impl(imp) => {
                imp.trait_.is_none()
                    && self
                        .impl_target(module, &imp.self_ty)
                        .is_some_and(|ty| ty.module == module && ty.name == name)
            }
            _ => false,
        })
    }

    fn walk_type_path(&self, start: &[usize], path: &TypePath) -> Option<TypeHandle> {
        let (last, leading) = path.segments.split_last()?;
        let module = self.walk_modules(start, leading)?;
        let PathSegment::Named(name) = last else {
            return None;
        };
        if !self.declares_type(&module, name) {
            return None;
        }
        Some(TypeHandle {
            module_path: self.module_path(&module),
            module,
            name: name.clone(),
        })
    }

    /// The type an impl block in `module` is for.
    ///
    /// `impl Circle` and `impl self::Circle` name a type of `module` itself.
    /// Longer paths are followed through the inline modules of the tree; a
    /// path that leaves the tree names an outside type, identified by its
    /// spelling.
    pub fn impl_target(&self, module: &[usize], self_ty: &Type) -> Option<TypeHandle> {
        let path = self_type_path(self_ty)?;
        let (last, leading) = path.segments.split_last()?;
        let PathSegment::Named(name) = last else {
            return None;
        };

        let start: &[usize] = if path.rooted { &[] } else { module };
        match self.walk_modules(start, leading) {
            Some(target) => Some(TypeHandle {
                module_path: self.module_path(&target),
                module: target,
                name: name.clone(),
            }),
            None => Some(TypeHandle {
                module: module.to_vec(),
                module_path: self.module_path(module),
                name: path.to_string(),
            }),
        }
    }

    /// Every inherent impl in the tree, depth first.
    pub fn inherent_impls(&self) -> Vec<(ImplAddr, &ItemImpl)> {
        fn walk<'a>(items: &'a [Item], module: &mut ModuleAddr, out: &mut Vec<(ImplAddr, &'a ItemImpl)>) {
            for (index, item) in items.iter().enumerate() {
                match item {
                    Item::Impl(imp) if imp.trait_.is_none() => out.push((
                        ImplAddr {
                            module: module.clone(),
                            item: index,
                        },
                        imp,
                    )),
                    Item::Mod(m) => {
                        if let Some((_, content)) = &m.content {
                            module.push(index);
                            walk(content, module, out);
                            module.pop();
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.items, &mut Vec::new(), &mut out);
        out
    }
}

impl ResolverService for ItemTree {
    fn find_type(&self, from: &[usize], path: &TypePath) -> Option<TypeHandle> {
        if path.rooted {
            return self.walk_type_path(&[], path);
        }
        if path.is_module_relative() || from.is_empty() {
            return self.walk_type_path(from, path);
        }
        self.walk_type_path(from, path)
            .or_else(|| self.walk_type_path(&[], path))
    }

    fn find_methods(&self, ty: &TypeHandle, name: &MethodReference, scope: MethodScope) -> Vec<MethodDecl> {
        let mut found = Vec::new();
        for (addr, imp) in self.inherent_impls() {
            let targets_ty = self
                .impl_target(&addr.module, &imp.self_ty)
                .is_some_and(|target| target.module == ty.module && target.name == ty.name);
            if !targets_ty {
                continue;
            }
            for (index, impl_item) in imp.items.iter().enumerate() {
                let ImplItem::Fn(func) = impl_item else { continue };
                if name.matches(&func.sig.ident) && scope.matches(func) {
                    found.push(MethodDecl {
                        location: MethodLocation {
                            impl_addr: addr.clone(),
                            index,
                        },
                        func: func.clone(),
                    });
                }
            }
        }
        found
    }
}

/// The path of an impl's self type, generic arguments dropped:
/// `geo::Wrapper` for `geo::Wrapper<T>`.
fn self_type_path(ty: &Type) -> Option<TypePath> {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => {
            let mut rooted = tp.path.leading_colon.is_some();
            let mut segments = Vec::with_capacity(tp.path.segments.len());
            for (i, segment) in tp.path.segments.iter().enumerate() {
                let ident = segment.ident.unraw().to_string();
                match ident.as_str() {
                    "crate" if i == 0 => rooted = true,
                    "self" if i == 0 => segments.push(PathSegment::SelfModule),
                    "super" => segments.push(PathSegment::Super),
                    _ => segments.push(PathSegment::Named(ident)),
                }
            }
            Some(TypePath { rooted, segments })
        }
        Type::Group(group) => self_type_path(&group.elem),
        Type::Paren(paren) => self_type_path(&paren.elem),
        _ => None,
    }
}
