//! This should fail: the second alias repeats a name already defined.
use alias_method::method_aliases;

pub struct T;

#[method_aliases]
impl T {
    pub fn add(x: i32, y: i32) -> i32 {
        x + y
    }

    alias_method!("sum", "self.add");
    alias_method!("sum", "self.add");
}

fn main() {
    let _ = T;
}
