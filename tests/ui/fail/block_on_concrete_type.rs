//! This should fail: a forwarded block cannot be stored in a concrete type.
use alias_method::method_aliases;

pub struct Counter;

pub struct Tally;

#[method_aliases]
impl Tally {
    pub fn count(&self, #[block] c: Counter) -> u32 {
        let _ = c;
        0
    }

    alias_method!("total", "count");
}

fn main() {
    let _ = (Tally, Counter);
}
