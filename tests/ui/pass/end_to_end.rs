use alias_method::method_aliases;

pub struct T;

#[method_aliases]
impl T {
    pub fn new() -> Self {
        T
    }

    pub fn add(x: i32, y: i32) -> i32 {
        x + y
    }

    pub fn with<R>(&self, arg: R, f: impl FnOnce(R) -> R) -> R {
        f(arg)
    }

    alias_method!("sum", "self.add");
    alias_method!("via", "with");
}

fn main() {
    assert_eq!(T::sum(3, 4), 7);
    assert_eq!(T::new().via(2, |v| v * v), 4);
}
