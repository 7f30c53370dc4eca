use alias_method::method_aliases;

#[method_aliases]
mod geometry {
    pub struct Point {
        pub x: i64,
        pub y: i64,
    }

    impl Point {
        pub fn origin() -> Self {
            Point { x: 0, y: 0 }
        }

        pub fn shifted(&self, dx: i64, dy: i64) -> Self {
            Point { x: self.x + dx, y: self.y + dy }
        }

        alias_method!(moved, "shifted");
        remove_method!("self.unknown");
    }

    pub mod presets {
        pub struct Presets;

        impl Presets {
            alias_method!("zero", "::Point.origin");
        }
    }
}

fn main() {
    let p = geometry::Point::zero().moved(2, 3);
    assert_eq!((p.x, p.y), (2, 3));
}
