//! Method aliases and method removal for Rust impl blocks.
//!
//! Rust has no `alias_method`. This crate provides one as an attribute that
//! rewrites the impl block (or inline module) it is attached to:
//!
//! ```
//! use alias_method::method_aliases;
//!
//! pub struct Calc;
//!
//! #[method_aliases]
//! impl Calc {
//!     pub fn add(x: i32, y: i32) -> i32 {
//!         x + y
//!     }
//!
//!     pub fn apply<R>(&self, arg: R, f: impl FnOnce(R) -> R) -> R {
//!         f(arg)
//!     }
//!
//!     alias_method!("sum", "self.add");
//!     alias_method!("via", "apply");
//! }
//!
//! assert_eq!(Calc::sum(3, 4), 7);
//! assert_eq!(Calc.via(2, |v| v * v), 4);
//! ```
//!
//! `remove_method!` keeps a method's signature but makes calling it panic with
//! a [`NoMethodError`] message:
//!
//! ```should_panic
//! use alias_method::method_aliases;
//!
//! pub struct Legacy;
//!
//! #[method_aliases]
//! impl Legacy {
//!     pub fn old(&self) -> u8 {
//!         1
//!     }
//!     remove_method!("old");
//! }
//!
//! Legacy.old(); // undefined method 'old' for rust_out::Legacy.
//! ```
//!
//! References that match nothing are skipped without an error. The
//! `alias-expand` binary (feature `cli`) performs the same rewrite on a
//! source file.

mod error;

pub use alias_method_macros::method_aliases;
pub use error::NoMethodError;

/// Define a method alias. Only meaningful inside an impl block expanded by
/// [`method_aliases`]; anywhere else it is a compile error.
#[macro_export]
macro_rules! alias_method {
    ($($args:tt)*) => {
        ::core::compile_error!(
            "`alias_method!` must be used inside an impl block annotated with `#[method_aliases]` (or inside a module annotated with it)"
        );
    };
}

/// Suppress a method. Only meaningful inside an impl block expanded by
/// [`method_aliases`]; anywhere else it is a compile error.
#[macro_export]
macro_rules! remove_method {
    ($($args:tt)*) => {
        ::core::compile_error!(
            "`remove_method!` must be used inside an impl block annotated with `#[method_aliases]` (or inside a module annotated with it)"
        );
    };
}

/// Runtime support referenced by generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    use crate::NoMethodError;

    /// Body of every suppressed method.
    #[cold]
    #[track_caller]
    pub fn undefined_method(name: &str, scope: &str) -> ! {
        let err = NoMethodError::new(name, scope);
        tracing::error!(method = name, scope, "suppressed method invoked");
        panic!("{err}")
    }
}
