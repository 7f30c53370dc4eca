//! Aliases generated by `#[method_aliases]`, checked by calling them.

use std::future::Future;

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

#[test]
fn test_static_and_callback_aliases() {
    assert_eq!(T::sum(3, 4), 7);
    assert_eq!(T::new().via(2, |v| v * v), 4);
}

#[test]
fn test_originals_still_work() {
    assert_eq!(T::add(3, 4), 7);
    assert_eq!(T::new().with(2, |v| v * v), 4);
}

// Every inherent impl of the same type contributes an overload.
pub struct W<V>(V);

#[method_aliases]
mod wrappers {
    use super::W;

    impl W<i32> {
        pub fn describe(&self) -> String {
            format!("int {}", self.0)
        }

        alias_method!(show, "describe");
    }

    impl W<String> {
        pub fn describe(&self) -> String {
            format!("text {}", self.0)
        }
    }
}

#[test]
fn test_alias_covers_every_overload() {
    assert_eq!(W(5).show(), "int 5");
    assert_eq!(W(String::from("x")).show(), "text x");
    assert_eq!(W(String::from("x")).describe(), "text x");
}

pub struct Counter {
    hits: u32,
}

#[method_aliases]
impl Counter {
    pub fn bump(&mut self, by: u32) -> u32 {
        self.hits += by;
        self.hits
    }

    // No such method, so nothing is generated.
    alias_method!("ghost", "nothing_here");
    alias_method!("ghost", "self.bump");

    alias_method!("incr", "bump");
}

#[test]
fn test_unresolved_reference_is_ignored() {
    let mut counter = Counter { hits: 0 };
    assert_eq!(counter.incr(2), 2);
    assert_eq!(counter.bump(3), 5);
}

// A block parameter typed through a trait that is not spelled as `Fn*`.
pub trait Visitor: FnMut(i32) {}
impl<F: FnMut(i32)> Visitor for F {}

pub trait PairVisitor: FnMut(i32, i32) {}
impl<F: FnMut(i32, i32)> PairVisitor for F {}

pub struct Numbers(Vec<i32>);

#[method_aliases]
impl Numbers {
    pub fn each<B: Visitor>(&self, #[block] mut b: B) {
        for n in &self.0 {
            b(*n);
        }
    }

    pub fn each_pair<B: PairVisitor>(&self, #[block] mut b: B) {
        for (i, n) in self.0.iter().enumerate() {
            b(i as i32, *n);
        }
    }

    alias_method!("for_each", "each");
    alias_method!("for_each_pair", "each_pair", 1);
}

#[test]
fn test_implicit_block_forwarding() {
    let numbers = Numbers(vec![1, 2, 3]);

    let mut total = 0;
    numbers.for_each(|n: i32| total += n);
    assert_eq!(total, 6);

    let mut weighted = 0;
    numbers.for_each_pair(|i: i32, n: i32| weighted += i * n);
    assert_eq!(weighted, 2 + 6);
}

// A block that takes nothing.
pub trait Tick: FnMut() {}
impl<F: FnMut()> Tick for F {}

pub struct Clock(u32);

#[method_aliases]
impl Clock {
    pub fn every<B: Tick>(&self, #[block] mut b: B) {
        for _ in 0..self.0 {
            b();
        }
    }

    pub fn every_with(&self, step: u32, #[block] mut b: impl Tick) -> u32 {
        let mut ticks = 0;
        while ticks < self.0 {
            b();
            ticks += step;
        }
        ticks
    }

    alias_method!("each_tick", "every");
    alias_method!("each_tick_with", "every_with");
}

#[test]
fn test_zero_arity_block_forwarding() {
    let clock = Clock(3);

    let mut ticks = 0;
    clock.each_tick(|| ticks += 1);
    assert_eq!(ticks, 3);

    let mut ticks = 0;
    assert_eq!(clock.each_tick_with(2, || ticks += 1), 4);
    assert_eq!(ticks, 2);
}

// Typed generic callbacks keep their explicit generic arguments.
pub struct Mapper;

#[method_aliases]
impl Mapper {
    pub fn map<R, F>(&self, value: i32, f: F) -> R
    where
        F: Fn(i32) -> R,
    {
        f(value)
    }

    pub async fn fetch(&self) -> u8 {
        7
    }

    pub unsafe fn raw(&self, p: *const u8) -> u8 {
        *p
    }

    alias_method!("transform", "map");
    alias_method!("get", "fetch");
    alias_method!("read_raw", "raw");
}

#[test]
fn test_generic_async_and_unsafe_overloads() {
    assert_eq!(Mapper.transform(4, |v| v.to_string()), "4");

    let byte = 9u8;
    // SAFETY: `byte` outlives the call.
    assert_eq!(unsafe { Mapper.read_raw(&byte) }, 9);

    // The future is ready on first poll.
    let fut = std::pin::pin!(Mapper.get());
    let waker = std::task::Waker::noop();
    let mut cx = std::task::Context::from_waker(waker);
    assert_eq!(fut.poll(&mut cx), std::task::Poll::Ready(7));
}

#[method_aliases]
mod shapes {
    pub struct Circle {
        pub radius: f64,
    }

    impl Circle {
        pub fn unit() -> Self {
            Circle { radius: 1.0 }
        }
    }

    pub mod build {
        pub struct Factory;

        impl Factory {
            alias_method!("unit_circle", "super::Circle.unit");
        }
    }
}

#[test]
fn test_alias_on_another_type() {
    assert_eq!(shapes::Circle::unit_circle().radius, 1.0);
}

#[method_aliases(hidden_prefix = "__orig_")]
impl Mapper {
    pub fn double(x: i32) -> i32 {
        x * 2
    }

    alias_method!("twice", "self.double");
}

#[test]
fn test_custom_hidden_prefix() {
    assert_eq!(Mapper::twice(21), 42);
}
