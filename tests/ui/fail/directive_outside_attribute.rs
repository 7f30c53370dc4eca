//! This should fail: the impl block is not annotated with `#[method_aliases]`.
use alias_method::alias_method;

pub struct T;

impl T {
    pub fn add(x: i32, y: i32) -> i32 {
        x + y
    }

    alias_method!("sum", "self.add");
}

fn main() {
    let _ = T;
    assert_eq!(T::add(1, 2), 3);
}
