//! The `[scope.]name` grammar used by `alias_method!` and `remove_method!`.
//!
//! Accepted forms:
//!
//! - `name` - a method with a `self` receiver on the enclosing type
//! - `self.name` - an associated function (no receiver) on the enclosing type
//! - `Other.name`, `inner::Other.name` - an associated function on another type,
//!   looked up from the enclosing module first and then from the root
//! - `::inner::Other.name`, `crate::inner::Other.name` - rooted at the expansion root
//! - `self::Other.name`, `super::Other.name` - relative to the enclosing module only

use std::fmt;

use syn::ext::IdentExt;

use crate::error::ReferenceError;

/// Where the referenced method lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverScope {
    /// No scope given: methods with a `self` receiver on the enclosing type.
    Instance,
    /// `self.`: associated functions of the enclosing type.
    Static,
    /// An explicit type path: associated functions of that type.
    Type(TypePath),
}

/// One segment of a receiver type path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Named(String),
    SelfModule,
    Super,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Named(name) => f.write_str(name),
            PathSegment::SelfModule => f.write_str("self"),
            PathSegment::Super => f.write_str("super"),
        }
    }
}

/// A `::`-separated path naming a type, e.g. `shapes::Circle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePath {
    /// Started with `::` or `crate::`.
    pub rooted: bool,
    pub segments: Vec<PathSegment>,
}

impl TypePath {
    /// True when the path begins with `self::` or `super::`, which pins the
    /// lookup to the enclosing module.
    pub fn is_module_relative(&self) -> bool {
        matches!(
            self.segments.first(),
            Some(PathSegment::SelfModule | PathSegment::Super)
        )
    }

    /// The type name at the end of the path.
    pub fn type_name(&self) -> Option<&str> {
        match self.segments.last() {
            Some(PathSegment::Named(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooted {
            f.write_str("::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// A parsed method reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodReference {
    pub scope: ReceiverScope,
    /// Method name as written, raw prefix included (`r#type`).
    pub name: String,
}

impl MethodReference {
    pub fn parse(text: &str) -> Result<Self, ReferenceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let (scope_text, name) = match text.rsplit_once('.') {
            Some((scope, name)) => (Some(scope.trim()), name.trim()),
            None => (None, text),
        };

        if name.is_empty() {
            return Err(ReferenceError::MissingName {
                reference: text.to_string(),
            });
        }
        parse_ident(name).ok_or_else(|| ReferenceError::InvalidName {
            name: name.to_string(),
        })?;

        let scope = match scope_text {
            None => ReceiverScope::Instance,
            Some("self") => ReceiverScope::Static,
            Some(path) => ReceiverScope::Type(parse_type_path(path, text)?),
        };

        Ok(Self {
            scope,
            name: name.to_string(),
        })
    }

    /// True when `ident` names the referenced method.
    pub fn matches(&self, ident: &syn::Ident) -> bool {
        ident.unraw() == self.name.trim_start_matches("r#")
    }
}

impl fmt::Display for MethodReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            ReceiverScope::Instance => f.write_str(&self.name),
            ReceiverScope::Static => write!(f, "self.{}", self.name),
            ReceiverScope::Type(path) => write!(f, "{path}.{}", self.name),
        }
    }
}

fn parse_ident(text: &str) -> Option<syn::Ident> {
    syn::parse_str::<syn::Ident>(text).ok()
}

fn parse_type_path(path: &str, reference: &str) -> Result<TypePath, ReferenceError> {
    let (rooted, rest) = if let Some(rest) = path.strip_prefix("::") {
        (true, rest)
    } else if let Some(rest) = path.strip_prefix("crate::") {
        (true, rest)
    } else {
        (false, path)
    };

    let mut segments = Vec::new();
    for raw in rest.split("::") {
        let segment = raw.trim();
        if segment.is_empty() {
            return Err(ReferenceError::EmptySegment {
                reference: reference.to_string(),
            });
        }
        let parsed = match segment {
            "self" if !rooted && segments.is_empty() => PathSegment::SelfModule,
            "super" if !rooted => PathSegment::Super,
            _ => match parse_ident(segment) {
                Some(_) => PathSegment::Named(segment.to_string()),
                None => {
                    return Err(ReferenceError::InvalidSegment {
                        segment: segment.to_string(),
                        reference: reference.to_string(),
                    })
                }
            },
        };
        segments.push(parsed);
    }

    let path = TypePath { rooted, segments };
    if path.type_name().is_none() {
        return Err(ReferenceError::InvalidSegment {
            segment: path
                .segments
                .last()
                .map(ToString::to_string)
                .unwrap_or_default(),
            reference: reference.to_string(),
        });
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(name: &str) -> PathSegment {
        PathSegment::Named(name.to_string())
    }

    #[test]
    fn test_bare_name_is_instance_scope() {
        let r = MethodReference::parse("add").unwrap();
        assert_eq!(r.scope, ReceiverScope::Instance);
        assert_eq!(r.name, "add");
    }

    #[test]
    fn test_self_prefix_is_static_scope() {
        let r = MethodReference::parse("self.add").unwrap();
        assert_eq!(r.scope, ReceiverScope::Static);
        assert_eq!(r.to_string(), "self.add");
    }

    #[test]
    fn test_type_path_scope() {
        let r = MethodReference::parse("shapes::Circle.area").unwrap();
        assert_eq!(
            r.scope,
            ReceiverScope::Type(TypePath {
                rooted: false,
                segments: vec![named("shapes"), named("Circle")],
            })
        );
        assert_eq!(r.name, "area");
    }

    #[test]
    fn test_rooted_paths() {
        for text in ["::shapes::Circle.area", "crate::shapes::Circle.area"] {
            let r = MethodReference::parse(text).unwrap();
            match r.scope {
                ReceiverScope::Type(path) => {
                    assert!(path.rooted, "{text} should be rooted");
                    assert_eq!(path.to_string(), "::shapes::Circle");
                }
                other => panic!("unexpected scope {other:?}"),
            }
        }
    }

    #[test]
    fn test_module_relative_paths() {
        let r = MethodReference::parse("super::Circle.area").unwrap();
        let ReceiverScope::Type(path) = r.scope else {
            panic!("expected a type scope");
        };
        assert!(path.is_module_relative());
        assert_eq!(path.segments, vec![PathSegment::Super, named("Circle")]);
    }

    #[test]
    fn test_raw_identifier_name() {
        let r = MethodReference::parse("r#type").unwrap();
        let ident: syn::Ident = syn::parse_quote!(r#type);
        assert!(r.matches(&ident));
    }

    #[test]
    fn test_rejects_malformed_references() {
        assert_eq!(MethodReference::parse("  "), Err(ReferenceError::Empty));
        assert!(matches!(
            MethodReference::parse("self."),
            Err(ReferenceError::MissingName { .. })
        ));
        assert!(matches!(
            MethodReference::parse("9lives"),
            Err(ReferenceError::InvalidName { .. })
        ));
        assert!(matches!(
            MethodReference::parse("a::::B.f"),
            Err(ReferenceError::EmptySegment { .. })
        ));
        assert!(matches!(
            MethodReference::parse("a::super.f"),
            Err(ReferenceError::InvalidSegment { .. })
        ));
    }
}
