//! This should fail: trait impls cannot gain new methods.
use alias_method::method_aliases;

#[method_aliases]
mod shapes {
    pub struct Square;

    impl Clone for Square {
        fn clone(&self) -> Self {
            Square
        }

        alias_method!("dup", "clone");
    }
}

fn main() {}
